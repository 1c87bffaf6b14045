//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI chat-completions API with no domain-specific logic.
//! Supports strict structured outputs and user turns that carry whole documents (PDFs) as
//! inline data URIs.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{FileInput, OpenAIClient, StructuredOutput, StructuredRequest};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let request = StructuredRequest::with_files(
//!     "gpt-4o",
//!     "You extract fields from contracts.",
//!     "Extract the fields from the attached agreement.",
//!     vec![FileInput::new("agreement.pdf", data_uri)],
//!     Agreement::openai_schema(),
//! );
//!
//! if let Some(json) = client.structured_output(request).await? {
//!     let agreement: Agreement = serde_json::from_str(&json)?;
//! }
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, compatible gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by a wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Structured output with JSON schema.
    ///
    /// Uses OpenAI's `json_schema` response format for guaranteed valid JSON.
    /// Returns `Ok(None)` when the model answers with no content (refusal or
    /// empty message) so callers can decide on their own fallback.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<Option<String>> {
        let start = std::time::Instant::now();

        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, model = %request.model, "OpenAI structured request failed");
            OpenAIError::from_transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI structured output error");
            return Err(OpenAIError::Api(format!(
                "OpenAI structured output error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                duration_ms = start.elapsed().as_millis(),
                "OpenAI structured output"
            );
        }

        let message = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        if let Some(refusal) = &message.refusal {
            warn!(model = %request.model, refusal = %refusal, "Model refused structured output");
        }

        Ok(message.content.filter(|content| !content.trim().is_empty()))
    }
}
