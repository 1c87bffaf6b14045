use axum::{body::Bytes, http::StatusCode};
use tracing::info;

/// POST /api/feedback
///
/// Accepts any body, logs it and answers 204.
pub async fn feedback_handler(body: Bytes) -> StatusCode {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(feedback) => info!(feedback = %feedback, "Feedback received"),
        Err(_) if body.is_empty() => info!("Feedback received (empty)"),
        Err(_) => info!(
            feedback = %String::from_utf8_lossy(&body),
            "Feedback received (not JSON)"
        ),
    }
    StatusCode::NO_CONTENT
}
