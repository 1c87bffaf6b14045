//! Integration tests for the directory-scan endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use test_context::test_context;

use crate::common::{set_modified_ago, write_pdf, TestHarness};
use server_core::domains::advisory::models::SignatureStatus;
use server_core::kernel::test_dependencies::{sample_record, MockAI};

const LIST: &str = "/api/advisory-documents";

fn documents(body: &Value) -> &Vec<Value> {
    body["documents"].as_array().expect("documents should be an array")
}

#[test_context(TestHarness)]
#[tokio::test]
async fn scan_classifies_complete_agreement_as_igo(ctx: &TestHarness) {
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    let response = ctx.get(LIST).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert!(body.get("warning").is_none());

    let document = &documents(&body)[0];
    assert_eq!(document["filename"], "agreement.pdf");
    assert_eq!(document["extension"], ".pdf");
    assert_eq!(document["status"], "IGO");
    assert_eq!(document["advisorName"], "Linda Moore");
    assert_eq!(document["accountHolders"], 1);
    assert!(document["id"].as_str().unwrap().starts_with("agreement.pdf-"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn second_scan_is_served_from_cache(ctx: &TestHarness) {
    write_pdf(&ctx.folders.documents, "first.pdf");
    write_pdf(&ctx.folders.documents, "second.pdf");

    let first = ctx.get(LIST).await.json();
    assert_eq!(ctx.ai.call_count(), 2);

    let second = ctx.get(LIST).await.json();

    assert_eq!(ctx.ai.call_count(), 2, "unchanged files must not be re-extracted");
    assert_eq!(documents(&first), documents(&second));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn modified_file_is_extracted_again(ctx: &TestHarness) {
    let path = write_pdf(&ctx.folders.documents, "agreement.pdf");
    set_modified_ago(&path, 120);
    ctx.get(LIST).await;

    set_modified_ago(&path, 10);
    ctx.get(LIST).await;

    assert_eq!(ctx.ai.call_count(), 2);
}

#[tokio::test]
async fn failed_extraction_is_cached_until_cache_is_cleared() {
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_failure("model unavailable"))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    let body = ctx.get(LIST).await.json();

    let document = &documents(&body)[0];
    assert_eq!(document["status"], "NIGO");
    assert_eq!(document["advisorName"], "Error");
    assert_eq!(document["clientSignedP11"], "Error");
    assert_eq!(document["accountHolders"], "Error");
    // Holder count is unknown, so only the 23 single-holder fields are judged
    assert_eq!(document["invalidFields"].as_array().unwrap().len(), 23);

    let again = ctx.get(LIST).await.json();
    assert_eq!(ctx.ai.call_count(), 1, "unchanged file is not re-extracted");
    assert_eq!(documents(&again)[0]["advisorName"], "Error");

    ctx.delete("/api/advisory-documents/cache").await;
    ctx.get(LIST).await;
    assert_eq!(ctx.ai.call_count(), 2);
}

#[tokio::test]
async fn unparsable_response_yields_error_record() {
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_response("I could not read this file."))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    let body = ctx.get(LIST).await.json();

    assert_eq!(documents(&body)[0]["feeType"], "Error");
    assert_eq!(documents(&body)[0]["status"], "NIGO");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reference_pdf_is_attached_after_target(ctx: &TestHarness) {
    write_pdf(&ctx.folders.reference, "analysis_example.pdf");
    write_pdf(&ctx.folders.reference, "analysis_template.pdf");
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    ctx.get(LIST).await;

    let call = ctx.ai.last_call().expect("model should have been called");
    assert_eq!(call.documents, vec!["agreement.pdf", "analysis_example.pdf"]);
    assert!(call.user_prompt.contains("second attached file"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn without_reference_only_target_is_sent(ctx: &TestHarness) {
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    ctx.get(LIST).await;

    let call = ctx.ai.last_call().unwrap();
    assert_eq!(call.documents, vec!["agreement.pdf"]);
    assert!(!call.user_prompt.contains("second attached file"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_folder_is_a_warning_not_an_error(ctx: &TestHarness) {
    std::fs::remove_dir_all(&ctx.folders.documents).unwrap();

    let response = ctx.get(LIST).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["count"], 0);
    assert!(body["warning"]
        .as_str()
        .unwrap()
        .starts_with("Documents folder not found"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn word_documents_are_listed_without_extraction(ctx: &TestHarness) {
    std::fs::write(ctx.folders.documents.join("notes.docx"), b"PK").unwrap();
    std::fs::write(ctx.folders.documents.join("readme.txt"), b"ignored").unwrap();
    std::fs::create_dir_all(ctx.folders.documents.join("archive.pdf")).unwrap();

    let body = ctx.get(LIST).await.json();

    assert_eq!(body["count"], 1);
    let document = &documents(&body)[0];
    assert_eq!(document["filename"], "notes.docx");
    assert!(document.get("status").is_none());
    assert!(document.get("advisorName").is_none());
    assert_eq!(ctx.ai.call_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn documents_are_listed_newest_first(ctx: &TestHarness) {
    let old = write_pdf(&ctx.folders.documents, "old.pdf");
    let new = write_pdf(&ctx.folders.documents, "new.pdf");
    let middle = write_pdf(&ctx.folders.documents, "middle.pdf");
    set_modified_ago(&old, 3000);
    set_modified_ago(&middle, 2000);
    set_modified_ago(&new, 1000);

    let body = ctx.get(LIST).await.json();

    let names: Vec<&str> = documents(&body)
        .iter()
        .map(|d| d["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["new.pdf", "middle.pdf", "old.pdf"]);
}

#[tokio::test]
async fn joint_account_requires_second_holder_fields() {
    let mut record = sample_record(2);
    record.client2_signed_p14 = Some(SignatureStatus::Missing);
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_record(&record))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "joint.pdf");

    let body = ctx.get(LIST).await.json();

    let document = &documents(&body)[0];
    assert_eq!(document["status"], "NIGO");
    assert_eq!(document["invalidFields"], serde_json::json!(["client2SignedP14"]));
}

#[tokio::test]
async fn single_holder_ignores_absent_second_holder_fields() {
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_record(&sample_record(1)))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "single.pdf");

    let body = ctx.get(LIST).await.json();

    assert_eq!(documents(&body)[0]["status"], "IGO");
}

#[tokio::test]
async fn legacy_contract_judges_client_fields_without_advisor_fields() {
    let mut record = sample_record(1);
    record.rep_code = "Missing".into();
    record.advisor_signed_p11 = SignatureStatus::No;
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_default_record(&record))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    let v2 = ctx.get(LIST).await.json();
    let v1 = ctx.get("/api/advisory-documents?contract=v1").await.json();

    assert_eq!(documents(&v2)[0]["status"], "NIGO");
    assert_eq!(
        documents(&v2)[0]["invalidFields"],
        serde_json::json!(["repCode", "advisorSignedP11"])
    );
    assert_eq!(documents(&v1)[0]["status"], "IGO");
}

#[tokio::test]
async fn legacy_contract_still_requires_client_page_fourteen() {
    let mut record = sample_record(1);
    record.client_signed_p14 = SignatureStatus::No;
    record.client_date_p11 = "Missing".into();
    let ctx = TestHarness::with_mock_ai(MockAI::new().with_default_record(&record))
        .await
        .unwrap();
    write_pdf(&ctx.folders.documents, "agreement.pdf");

    let v1 = ctx.get("/api/advisory-documents?contract=v1").await.json();

    assert_eq!(documents(&v1)[0]["status"], "NIGO");
    assert_eq!(
        documents(&v1)[0]["invalidFields"],
        serde_json::json!(["clientDateP11", "clientSignedP14"])
    );
}
