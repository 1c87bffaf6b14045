//! OpenAI-backed implementation of [`BaseAI`].

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use openai_client::{FileInput, OpenAIClient, StructuredRequest};
use tracing::debug;

use super::{BaseAI, DocumentInput};

/// Multimodal extraction through the chat-completions API.
pub struct OpenAIDocumentAI {
    client: OpenAIClient,
    model: String,
}

impl OpenAIDocumentAI {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build from an API key, an optional gateway URL and a request timeout.
    pub fn from_key(
        api_key: &str,
        base_url: Option<&str>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let mut client = OpenAIClient::new(api_key).with_timeout(timeout);
        if let Some(url) = base_url {
            client = client.with_base_url(url);
        }
        Self::new(client, model)
    }
}

#[async_trait]
impl BaseAI for OpenAIDocumentAI {
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        documents: &[DocumentInput],
        schema: serde_json::Value,
    ) -> Result<Option<String>> {
        let files = documents
            .iter()
            .map(|doc| FileInput::new(doc.filename.clone(), doc.data_uri()))
            .collect();

        debug!(
            model = %self.model,
            documents = documents.len(),
            "Sending structured extraction request"
        );

        let request =
            StructuredRequest::with_files(&self.model, system_prompt, user_prompt, files, schema)
                .schema_name("advisory_agreement");

        self.client
            .structured_output(request)
            .await
            .context("OpenAI structured extraction failed")
    }
}

/// Stand-in used when no API key is configured; every call fails.
pub struct UnconfiguredAI;

#[async_trait]
impl BaseAI for UnconfiguredAI {
    async fn generate_structured(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _documents: &[DocumentInput],
        _schema: serde_json::Value,
    ) -> Result<Option<String>> {
        Err(anyhow!(
            "The AI service is not configured. Set OPENAI_API_KEY to enable extraction."
        ))
    }

    fn is_configured(&self) -> bool {
        false
    }
}
