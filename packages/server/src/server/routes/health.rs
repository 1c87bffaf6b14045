use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    documents_folder: String,
    ai_configured: bool,
    cached_extractions: usize,
}

/// Health check endpoint
///
/// Reports the scanned folder, whether extraction credentials are present and
/// how many extractions are cached. Always 200; a degraded AI still serves the UI.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let deps = &state.deps;
    let cached_extractions = match deps.cache.len().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read extraction cache size");
            0
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        documents_folder: deps.folders.documents.to_string_lossy().into_owned(),
        ai_configured: deps.ai.is_configured(),
        cached_extractions,
    })
}
