use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::advisory::actions::{self, GenerationRequest};
use crate::domains::advisory::generator::GeneratedItem;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfsBody {
    #[serde(default)]
    pdf_base64: Option<String>,
    count: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfsResponse {
    success: bool,
    message: String,
    file_paths: Vec<String>,
    metadata: Vec<GeneratedItem>,
}

/// POST /api/generate-pdfs
///
/// `count` must be within 1..=1000. Items fail independently; the request only
/// fails when nothing could be generated.
pub async fn generate_pdfs_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<GeneratePdfsBody>, JsonRejection>,
) -> Result<Json<GeneratePdfsResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request("Invalid request body", e.body_text()))?;
    let count = body
        .count
        .ok_or_else(|| ApiError::bad_request("Invalid count", "count is required"))?;

    let report = actions::generate_documents(
        &state.deps,
        GenerationRequest {
            count,
            template_base64: body.pdf_base64,
        },
    )
    .await?;

    let file_paths = report.file_paths();
    let message = if file_paths.len() == report.items.len() {
        format!("Generated {} PDFs with random data", file_paths.len())
    } else {
        format!(
            "Generated {} of {} PDFs with random data",
            file_paths.len(),
            report.items.len()
        )
    };

    Ok(Json(GeneratePdfsResponse {
        success: true,
        message,
        file_paths,
        metadata: report.items,
    }))
}
