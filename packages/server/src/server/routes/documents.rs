use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::advisory::actions::{self, DocumentReview};
use crate::domains::advisory::models::{parse_overrides, ReviewedDocument};
use crate::domains::advisory::{AdvisoryError, ContractVersion};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ContractParams {
    #[serde(default)]
    contract: ContractVersion,
}

#[derive(Serialize)]
pub struct DocumentListResponse {
    success: bool,
    documents: Vec<ReviewedDocument>,
    count: usize,
    folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

/// GET /api/advisory-documents
///
/// Always 200: folder problems surface as `warning`, extraction problems as
/// sentinel values on the affected documents.
pub async fn list_documents_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ContractParams>,
) -> Json<DocumentListResponse> {
    let listing = actions::list_documents(&state.deps, params.contract).await;

    Json(DocumentListResponse {
        success: true,
        count: listing.documents.len(),
        documents: listing.documents,
        folder: listing.folder,
        warning: listing.warning,
    })
}

#[derive(Debug, Deserialize)]
pub struct OverridePatch {
    fields: BTreeMap<String, String>,
}

/// PATCH /api/advisory-documents/:id/overrides
pub async fn update_overrides_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ContractParams>,
    body: Result<Json<OverridePatch>, JsonRejection>,
) -> Result<Json<DocumentReview>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request("Invalid override patch", e.body_text()))?;
    let patch = parse_overrides(body.fields).map_err(AdvisoryError::from)?;

    let review = actions::apply_overrides(&state.deps, &id, patch, params.contract).await?;
    Ok(Json(review))
}

/// DELETE /api/advisory-documents/:id/overrides
pub async fn clear_overrides_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ContractParams>,
) -> Result<Json<DocumentReview>, ApiError> {
    let review = actions::clear_overrides(&state.deps, &id, params.contract).await?;
    Ok(Json(review))
}

#[derive(Serialize)]
pub struct ClearCacheResponse {
    success: bool,
    cleared: usize,
}

/// DELETE /api/advisory-documents/cache
pub async fn clear_cache_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let cleared = actions::clear_extraction_cache(&state.deps).await?;
    Ok(Json(ClearCacheResponse {
        success: true,
        cleared,
    }))
}
