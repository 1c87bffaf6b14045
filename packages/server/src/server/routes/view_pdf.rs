use axum::{
    extract::{Extension, Query},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::domains::advisory::actions;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ViewPdfParams {
    path: Option<String>,
}

/// GET /api/view-pdf?path=
///
/// Serves a PDF from inside the documents folder, inline.
pub async fn view_pdf_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ViewPdfParams>,
) -> Result<impl IntoResponse, ApiError> {
    let file = actions::read_document(&state.deps, params.path.as_deref()).await?;

    let disposition = format!("inline; filename=\"{}\"", file.filename.replace('"', ""));
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
