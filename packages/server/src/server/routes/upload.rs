use axum::extract::{Extension, Multipart};
use axum::Json;
use serde::Serialize;

use crate::domains::advisory::actions::{self, ReferencePaths};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Serialize)]
pub struct UploadAnalysisResponse {
    success: bool,
    message: String,
    paths: ReferencePaths,
}

/// POST /api/upload-analysis
///
/// Multipart form with `blankPdf` and `filledPdf`; both replace the reference pair.
pub async fn upload_analysis_handler(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadAnalysisResponse>, ApiError> {
    let mut blank = None;
    let mut filled = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("Invalid multipart body", e.body_text()))?
    {
        let target = match field.name() {
            Some("blankPdf") => &mut blank,
            Some("filledPdf") => &mut filled,
            _ => continue,
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request("Invalid multipart body", e.body_text()))?;
        *target = Some(bytes.to_vec());
    }

    let paths = actions::store_reference_pdfs(&state.deps, blank, filled).await?;
    Ok(Json(UploadAnalysisResponse {
        success: true,
        message: "Reference agreements uploaded".to_string(),
        paths,
    }))
}
