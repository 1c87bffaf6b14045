use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::domains::advisory::error::{AdvisoryError, AdvisoryResult};
use crate::kernel::ServerDeps;

/// Blank form kept alongside the example for reviewers.
pub const BLANK_REFERENCE_FILENAME: &str = "analysis_template.pdf";

/// Completed example; sorts first, so extraction calls attach it.
pub const FILLED_REFERENCE_FILENAME: &str = "analysis_example.pdf";

#[derive(Debug, Clone, Serialize)]
pub struct ReferencePaths {
    pub blank: String,
    pub filled: String,
}

/// Replace the reference pair used to guide extraction.
pub async fn store_reference_pdfs(
    deps: &ServerDeps,
    blank: Option<Vec<u8>>,
    filled: Option<Vec<u8>>,
) -> AdvisoryResult<ReferencePaths> {
    let blank = blank.ok_or(AdvisoryError::MissingInput { name: "blankPdf" })?;
    let filled = filled.ok_or(AdvisoryError::MissingInput { name: "filledPdf" })?;

    let folder = &deps.folders.reference;
    tokio::fs::create_dir_all(folder)
        .await
        .with_context(|| format!("failed to create {}", folder.display()))?;

    let blank_path = folder.join(BLANK_REFERENCE_FILENAME);
    let filled_path = folder.join(FILLED_REFERENCE_FILENAME);
    write(&blank_path, &blank).await?;
    write(&filled_path, &filled).await?;

    info!(
        blank_kb = blank.len() / 1024,
        filled_kb = filled.len() / 1024,
        folder = %folder.display(),
        "Stored reference agreements"
    );

    Ok(ReferencePaths {
        blank: blank_path.to_string_lossy().into_owned(),
        filled: filled_path.to_string_lossy().into_owned(),
    })
}

async fn write(path: &Path, bytes: &[u8]) -> AdvisoryResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
