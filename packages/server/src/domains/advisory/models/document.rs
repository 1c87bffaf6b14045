use chrono::{DateTime, Utc};
use serde::Serialize;

use super::fields::{FieldKey, FieldOverrides};
use super::record::ExtractedRecord;
use crate::domains::advisory::validity::ComplianceStatus;

/// A file found in the documents folder.
///
/// PDFs carry the extracted record flattened into the same object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedDocument {
    /// `{filename}-{mtime_ms}`; changes whenever the file does
    pub id: String,
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Lower-cased, with the leading dot (`.pdf`)
    pub extension: String,
    #[serde(flatten)]
    pub record: Option<ExtractedRecord>,
}

impl ScannedDocument {
    pub fn is_pdf(&self) -> bool {
        self.extension == ".pdf"
    }
}

/// A scanned document plus its review state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedDocument {
    #[serde(flatten)]
    pub document: ScannedDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_fields: Vec<FieldKey>,
    #[serde(skip_serializing_if = "FieldOverrides::is_empty")]
    pub overrides: FieldOverrides,
}
