//! OpenAI API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Messages
// =============================================================================

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content (plain text or a list of typed parts)
    pub content: MessageContent,
}

/// Message content: either a plain string or multi-part content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One part of a multi-part user message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Free text
    Text { text: String },

    /// An attached file (PDF and friends), sent inline as a data URI
    File { file: FileInput },
}

/// Inline file payload for a `file` content part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInput {
    /// Display filename (the model sees it, so keep it meaningful)
    pub filename: String,

    /// `data:<mime>;base64,<payload>`
    pub file_data: String,
}

impl FileInput {
    /// Create a file input from a filename and an already-encoded data URI.
    pub fn new(filename: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_data: data_uri.into(),
        }
    }
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a user message carrying text followed by attached files, in order.
    pub fn user_with_files(text: impl Into<String>, files: Vec<FileInput>) -> Self {
        let mut parts = Vec::with_capacity(files.len() + 1);
        parts.push(ContentPart::Text { text: text.into() });
        parts.extend(files.into_iter().map(|file| ContentPart::File { file }));

        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Raw chat response from API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageResponse {
    /// Null when the model refuses or returns only tool calls
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

/// Token accounting reported with each completion; attached PDFs count as prompt tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// =============================================================================
// Structured Output
// =============================================================================

/// Structured output request with JSON schema.
#[derive(Debug, Serialize)]
pub struct StructuredRequest {
    /// Model to use
    pub model: String,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Response format with JSON schema
    pub response_format: ResponseFormat,
}

impl StructuredRequest {
    /// Create a new structured request.
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self::with_user_message(model, system, Message::user(user), schema)
    }

    /// Create a structured request whose user turn carries attached files.
    pub fn with_files(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        files: Vec<FileInput>,
        schema: serde_json::Value,
    ) -> Self {
        Self::with_user_message(model, system, Message::user_with_files(user, files), schema)
    }

    fn with_user_message(
        model: impl Into<String>,
        system: impl Into<String>,
        user: Message,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system), user],
            temperature: Some(0.0),
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "structured_response".to_string(),
                    strict: true,
                    schema,
                },
            },
        }
    }

    /// Rename the schema (shows up in provider dashboards and logs).
    pub fn schema_name(mut self, name: impl Into<String>) -> Self {
        self.response_format.json_schema.name = name.into();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

// =============================================================================
// Utilities
// =============================================================================

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
