use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::domains::advisory::error::{AdvisoryError, AdvisoryResult};
use crate::domains::advisory::models::{
    ExtractedRecord, FieldKey, FieldOverrides, FieldValues, ReviewedDocument, ScannedDocument,
};
use crate::domains::advisory::validity::{evaluate, ComplianceStatus, ContractVersion};
use crate::kernel::ServerDeps;

// =============================================================================
// Scanning
// =============================================================================

#[derive(Debug, Clone)]
pub struct DocumentListing {
    pub folder: String,
    pub documents: Vec<ReviewedDocument>,
    pub warning: Option<String>,
}

/// Scan the documents folder and classify every PDF.
///
/// Overrides are merged over each extracted record before evaluation.
pub async fn list_documents(deps: &ServerDeps, version: ContractVersion) -> DocumentListing {
    let outcome = deps.scanner.scan(&deps.folders.documents).await;

    // Ids carry the mtime, so patches for replaced file versions are stale
    if outcome.warning.is_none() {
        let current: HashSet<&str> = outcome
            .documents
            .iter()
            .filter(|document| document.record.is_some())
            .map(|document| document.id.as_str())
            .collect();
        let pruned = deps.overrides.retain_documents(&current);
        if pruned > 0 {
            debug!(pruned, "Dropped overrides for documents no longer on disk");
        }
    }

    let documents = outcome
        .documents
        .into_iter()
        .map(|document| review_document(deps, document, version))
        .collect();

    let warning = outcome.warning.or_else(|| {
        (!deps.ai.is_configured())
            .then(|| "OPENAI_API_KEY is not set; extracted fields show as Error".to_string())
    });

    DocumentListing {
        folder: deps.folders.documents.to_string_lossy().into_owned(),
        documents,
        warning,
    }
}

fn review_document(
    deps: &ServerDeps,
    document: ScannedDocument,
    version: ContractVersion,
) -> ReviewedDocument {
    let overrides = deps.overrides.get(&document.id);
    let report = document
        .record
        .as_ref()
        .map(|record| evaluate(&record.to_fields().merged(&overrides), version));

    ReviewedDocument {
        status: report.as_ref().map(|r| r.status),
        invalid_fields: report.map(|r| r.invalid_fields).unwrap_or_default(),
        overrides,
        document,
    }
}

// =============================================================================
// Reviewer overrides
// =============================================================================

/// Recomputed review state for one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReview {
    pub id: String,
    pub status: ComplianceStatus,
    pub invalid_fields: Vec<FieldKey>,
    pub overrides: FieldOverrides,
    /// Extracted values with overrides applied
    pub fields: FieldValues,
}

fn review_record(
    id: &str,
    record: &ExtractedRecord,
    overrides: FieldOverrides,
    version: ContractVersion,
) -> DocumentReview {
    let fields = record.to_fields().merged(&overrides);
    let report = evaluate(&fields, version);

    DocumentReview {
        id: id.to_string(),
        status: report.status,
        invalid_fields: report.invalid_fields,
        overrides,
        fields,
    }
}

/// Merge a reviewer patch into a document's overrides and re-evaluate.
pub async fn apply_overrides(
    deps: &ServerDeps,
    id: &str,
    patch: FieldOverrides,
    version: ContractVersion,
) -> AdvisoryResult<DocumentReview> {
    let record = deps
        .scanner
        .record_for(id)
        .await
        .ok_or_else(|| AdvisoryError::DocumentNotFound { id: id.to_string() })?;

    let keys: Vec<&str> = patch.keys().map(|k| k.as_str()).collect();
    info!(document = %id, fields = ?keys, "Applying reviewer overrides");

    let overrides = deps.overrides.merge(id, patch);
    Ok(review_record(id, &record, overrides, version))
}

/// Drop every override for a document and re-evaluate the extracted record.
pub async fn clear_overrides(
    deps: &ServerDeps,
    id: &str,
    version: ContractVersion,
) -> AdvisoryResult<DocumentReview> {
    let record = deps
        .scanner
        .record_for(id)
        .await
        .ok_or_else(|| AdvisoryError::DocumentNotFound { id: id.to_string() })?;

    if deps.overrides.clear(id) {
        info!(document = %id, "Cleared reviewer overrides");
    }
    Ok(review_record(id, &record, FieldOverrides::new(), version))
}

// =============================================================================
// Cache administration
// =============================================================================

/// Forget every cached extraction; the next scan re-analyzes all PDFs.
pub async fn clear_extraction_cache(deps: &ServerDeps) -> AdvisoryResult<usize> {
    let cleared = deps.cache.clear().await?;
    info!(cleared, "Extraction cache cleared");
    Ok(cleared)
}
