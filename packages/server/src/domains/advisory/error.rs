//! Typed errors for advisory actions.
//!
//! Each variant maps to one HTTP outcome in the server layer.

use thiserror::Error;

use super::models::UnknownField;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// Batch size outside the accepted range
    #[error("count must be between 1 and {max}, got {count}")]
    InvalidCount { count: i64, max: u32 },

    /// Supplied template could not be decoded
    #[error("invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// Every item in a generation batch failed
    #[error("no documents were generated: {details}")]
    NothingGenerated { details: String },

    /// No document with this id in the latest scan
    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    /// Override patch named a key outside the contract
    #[error(transparent)]
    UnknownField(#[from] UnknownField),

    /// Required request input absent
    #[error("missing required input: {name}")]
    MissingInput { name: &'static str },

    /// Requested path resolves outside the documents root
    #[error("access denied: {path}")]
    OutsideRoot { path: String },

    /// Requested file does not exist
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Anything else (I/O, serialization)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AdvisoryResult<T> = std::result::Result<T, AdvisoryError>;
