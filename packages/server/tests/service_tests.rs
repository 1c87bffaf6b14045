//! Integration tests for health, feedback, reference upload and cache administration.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use test_context::test_context;

use crate::common::{acroform_pdf, write_pdf, TestHarness};
use server_core::config::AdvisoryFolders;
use server_core::domains::advisory::actions::{self, FILLED_REFERENCE_FILENAME};
use server_core::domains::advisory::{ContractVersion, ExtractionCache, MemoryExtractionCache};
use server_core::kernel::{ExtractionThrottle, ServerDeps, ThrottlePolicy, UnconfiguredAI};

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_folder_and_cache(ctx: &TestHarness) {
    write_pdf(&ctx.folders.documents, "agreement.pdf");
    ctx.get("/api/advisory-documents").await;

    let response = ctx.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["aiConfigured"], true);
    assert_eq!(body["cachedExtractions"], 1);
    assert_eq!(
        body["documentsFolder"],
        ctx.folders.documents.to_string_lossy().as_ref()
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn feedback_is_accepted_with_no_content(ctx: &TestHarness) {
    let response = ctx
        .post_json("/api/feedback", json!({ "documentId": "a.pdf-1", "comment": "fee looks wrong" }))
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn clearing_cache_forces_re_extraction(ctx: &TestHarness) {
    write_pdf(&ctx.folders.documents, "a.pdf");
    write_pdf(&ctx.folders.documents, "b.pdf");
    ctx.get("/api/advisory-documents").await;
    assert_eq!(ctx.cache.len().await.unwrap(), 2);

    let response = ctx.delete("/api/advisory-documents/cache").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "success": true, "cleared": 2 }));
    assert_eq!(ctx.cache.len().await.unwrap(), 0);

    ctx.get("/api/advisory-documents").await;
    assert_eq!(ctx.ai.call_count(), 4);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn uploaded_reference_pair_is_stored_and_used(ctx: &TestHarness) {
    let blank = acroform_pdf(&["Client Name Printed"]);
    let filled = b"%PDF-1.4 filled example".to_vec();

    let response = ctx
        .post_multipart(
            "/api/upload-analysis",
            &[("blankPdf", blank.as_slice()), ("filledPdf", filled.as_slice())],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    let filled_path = body["paths"]["filled"].as_str().unwrap();
    assert!(filled_path.ends_with(FILLED_REFERENCE_FILENAME));
    assert_eq!(std::fs::read(filled_path).unwrap(), filled);
    assert_eq!(
        std::fs::read(body["paths"]["blank"].as_str().unwrap()).unwrap(),
        blank
    );

    write_pdf(&ctx.folders.documents, "agreement.pdf");
    ctx.get("/api/advisory-documents").await;
    assert_eq!(
        ctx.ai.last_call().unwrap().documents,
        vec!["agreement.pdf", FILLED_REFERENCE_FILENAME]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_requires_both_files(ctx: &TestHarness) {
    let response = ctx
        .post_multipart("/api/upload-analysis", &[("blankPdf", b"%PDF-1.4".as_slice())])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Missing filledPdf");
}

#[tokio::test]
async fn missing_credentials_degrade_to_error_records() {
    let root = tempfile::tempdir().unwrap();
    let folders = AdvisoryFolders::under(root.path());
    write_pdf(&folders.documents, "agreement.pdf");

    let deps = ServerDeps::new(
        Arc::new(UnconfiguredAI),
        Arc::new(MemoryExtractionCache::new()),
        ExtractionThrottle::new(ThrottlePolicy::unthrottled()),
        folders,
    );

    let listing = actions::list_documents(&deps, ContractVersion::V2).await;

    assert!(listing.warning.unwrap().contains("OPENAI_API_KEY"));
    let record = listing.documents[0].document.record.as_ref().unwrap();
    assert!(record.is_error_sentinel());
    assert_eq!(deps.cache.len().await.unwrap(), 1);
}
