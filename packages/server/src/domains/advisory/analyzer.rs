//! Turns one agreement PDF into an [`ExtractedRecord`] via the multimodal model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use openai_client::{strip_code_blocks, truncate_to_char_boundary, StructuredOutput};
use tracing::{debug, info, warn};

use super::models::{ExtractedRecord, Sentinel};
use super::prompts::{user_instructions, SYSTEM_PROMPT};
use crate::kernel::{BaseAI, DocumentInput, ExtractionThrottle};

/// Anything that can read an agreement. The scanner only depends on this.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<ExtractedRecord>;
}

/// Extraction through [`BaseAI`], paced by an [`ExtractionThrottle`].
///
/// Never fails: any problem reading the file, reaching the model or parsing
/// its answer yields the all-`Error` record.
pub struct AgreementAnalyzer {
    ai: Arc<dyn BaseAI>,
    throttle: ExtractionThrottle,
    reference_folder: Option<PathBuf>,
}

impl AgreementAnalyzer {
    pub fn new(ai: Arc<dyn BaseAI>, throttle: ExtractionThrottle) -> Self {
        Self {
            ai,
            throttle,
            reference_folder: None,
        }
    }

    /// Attach the first PDF found in `folder` as a worked example.
    pub fn with_reference_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.reference_folder = Some(folder.into());
        self
    }

    pub fn throttle(&self) -> &ExtractionThrottle {
        &self.throttle
    }

    async fn try_analyze(&self, path: &Path) -> Result<Option<ExtractedRecord>> {
        let target = read_pdf(path).await?;
        let mut documents = vec![target];

        if let Some(folder) = &self.reference_folder {
            if let Some(reference) = find_reference(folder).await {
                documents.push(reference);
            }
        }

        let with_reference = documents.len() > 1;
        info!(
            file = %documents[0].filename,
            size_kb = documents[0].size_kb(),
            with_reference,
            "Analyzing agreement"
        );

        let _permit = self.throttle.acquire().await?;
        let timeout = self.throttle.call_timeout();
        let response = tokio::time::timeout(
            timeout,
            self.ai.generate_structured(
                SYSTEM_PROMPT,
                &user_instructions(with_reference),
                &documents,
                ExtractedRecord::openai_schema(),
            ),
        )
        .await
        .map_err(|_| anyhow!("extraction call exceeded {}s", timeout.as_secs_f32()))??;

        response.map(|raw| parse_record(&raw)).transpose()
    }
}

#[async_trait]
impl DocumentAnalyzer for AgreementAnalyzer {
    async fn analyze(&self, path: &Path) -> Result<ExtractedRecord> {
        match self.try_analyze(path).await {
            Ok(Some(record)) => {
                debug!(path = %path.display(), "Extraction complete");
                Ok(record)
            }
            Ok(None) => {
                warn!(path = %path.display(), "Model returned no content");
                Ok(ExtractedRecord::sentinel(Sentinel::Error))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{:#}", e), "Extraction failed");
                Ok(ExtractedRecord::sentinel(Sentinel::Error))
            }
        }
    }
}

/// Parse model output into a record, tolerating a markdown fence.
pub fn parse_record(raw: &str) -> Result<ExtractedRecord> {
    serde_json::from_str(strip_code_blocks(raw)).with_context(|| {
        format!(
            "unparsable extraction response: {}",
            truncate_to_char_boundary(raw, 200)
        )
    })
}

async fn read_pdf(path: &Path) -> Result<DocumentInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    Ok(DocumentInput::pdf(filename, bytes))
}

/// First `.pdf` in `folder` by name. Unreadable folders mean "no reference".
async fn find_reference(folder: &Path) -> Option<DocumentInput> {
    let mut entries = match tokio::fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(folder = %folder.display(), error = %e, "No reference folder");
            return None;
        }
    };

    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    let first = candidates.into_iter().next()?;
    match read_pdf(&first).await {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Skipping unreadable reference PDF");
            None
        }
    }
}
