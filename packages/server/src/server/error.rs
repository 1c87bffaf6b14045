//! HTTP error responses.
//!
//! Every failure renders as `{ "error": ..., "details": ... }` with a status
//! chosen from the domain error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domains::advisory::AdvisoryError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{error}")]
    BadRequest {
        error: String,
        details: Option<String>,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{error}")]
    Internal { error: String, details: String },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest { error, details } => ErrorBody { error, details },
            Self::Forbidden(error) | Self::NotFound(error) => ErrorBody {
                error,
                details: None,
            },
            Self::Internal { error, details } => ErrorBody {
                error,
                details: Some(details),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AdvisoryError> for ApiError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::InvalidCount { .. } => {
                ApiError::bad_request("Invalid count", err.to_string())
            }
            AdvisoryError::InvalidTemplate { .. } => {
                ApiError::bad_request("Invalid template PDF", err.to_string())
            }
            AdvisoryError::UnknownField(_) => {
                ApiError::bad_request("Unknown field", err.to_string())
            }
            AdvisoryError::MissingInput { name } => {
                ApiError::bad_request(format!("Missing {}", name), err.to_string())
            }
            AdvisoryError::OutsideRoot { .. } => ApiError::Forbidden("Access denied".to_string()),
            AdvisoryError::DocumentNotFound { .. } | AdvisoryError::FileNotFound { .. } => {
                ApiError::NotFound(err.to_string())
            }
            AdvisoryError::NothingGenerated { details } => ApiError::Internal {
                error: "Failed to generate PDFs".to_string(),
                details,
            },
            AdvisoryError::Internal(e) => ApiError::from(e),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %format!("{:#}", err), "Request failed");
        ApiError::Internal {
            error: "Internal server error".to_string(),
            details: format!("{:#}", err),
        }
    }
}
