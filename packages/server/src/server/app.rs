//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    clear_cache_handler, clear_overrides_handler, feedback_handler, generate_pdfs_handler,
    health_handler, list_documents_handler, update_overrides_handler, upload_analysis_handler,
    view_pdf_handler,
};

/// Uploaded templates and reference agreements can be large scanned PDFs.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    let app_state = AppState { deps };

    // CORS configuration - allow any origin for the review UI
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Review surface
        .route("/api/advisory-documents", get(list_documents_handler))
        .route("/api/advisory-documents/cache", delete(clear_cache_handler))
        .route(
            "/api/advisory-documents/:id/overrides",
            patch(update_overrides_handler).delete(clear_overrides_handler),
        )
        .route("/api/view-pdf", get(view_pdf_handler))
        // Synthetic data and reference material
        .route("/api/generate-pdfs", post(generate_pdfs_handler))
        .route("/api/upload-analysis", post(upload_analysis_handler))
        .route("/api/feedback", post(feedback_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
