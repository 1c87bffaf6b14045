// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "extract an agreement") lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI)

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;

// =============================================================================
// Document inputs
// =============================================================================

/// A whole document handed to a multimodal model, in the order it should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInput {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn pdf(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: "application/pdf".to_string(),
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn size_kb(&self) -> usize {
        self.bytes.len() / 1024
    }
}

// =============================================================================
// AI Trait (Infrastructure - multimodal structured extraction)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Generate structured output constrained by a JSON schema.
    ///
    /// `documents` are attached to the user turn after the text, in order.
    /// Returns the raw JSON text, or `None` when the model produced no content.
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        documents: &[DocumentInput],
        schema: serde_json::Value,
    ) -> Result<Option<String>>;

    /// Whether credentials are present. Unconfigured providers still answer
    /// calls, with an error.
    fn is_configured(&self) -> bool {
        true
    }
}
