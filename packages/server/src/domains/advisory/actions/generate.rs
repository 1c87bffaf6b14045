use base64::Engine;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::domains::advisory::error::{AdvisoryError, AdvisoryResult};
use crate::domains::advisory::generator::{GenerationReport, PdfGenerator, TemplateSource, MAX_BATCH};
use crate::kernel::ServerDeps;

/// A batch generation request as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub count: i64,
    /// Raw base64 or a `data:` URI of a blank form used for every item
    pub template_base64: Option<String>,
}

/// Accept counts in `1..=MAX_BATCH`.
pub fn validate_count(count: i64) -> AdvisoryResult<u32> {
    u32::try_from(count)
        .ok()
        .filter(|count| (1..=MAX_BATCH).contains(count))
        .ok_or(AdvisoryError::InvalidCount {
            count,
            max: MAX_BATCH,
        })
}

/// Decode a caller-supplied template, with or without a `data:` prefix.
pub fn decode_template(input: &str) -> AdvisoryResult<Vec<u8>> {
    let payload = match input.trim() {
        data_uri if data_uri.starts_with("data:") => data_uri
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| AdvisoryError::InvalidTemplate {
                reason: "data URI has no payload".to_string(),
            })?,
        raw => raw,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AdvisoryError::InvalidTemplate {
            reason: e.to_string(),
        })?;

    if bytes.is_empty() {
        return Err(AdvisoryError::InvalidTemplate {
            reason: "template is empty".to_string(),
        });
    }
    Ok(bytes)
}

/// Generate a batch of synthetic agreements into the output folder.
///
/// Succeeds when at least one document was written; per-item failures are
/// reported in the returned items.
pub async fn generate_documents(
    deps: &ServerDeps,
    request: GenerationRequest,
) -> AdvisoryResult<GenerationReport> {
    let count = validate_count(request.count)?;
    let supplied = request
        .template_base64
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(decode_template)
        .transpose()?;

    let source = match &supplied {
        Some(bytes) => TemplateSource::Supplied(bytes),
        None => TemplateSource::Catalog(&deps.templates),
    };

    info!(
        count,
        custom_template = supplied.is_some(),
        "Generating synthetic agreements"
    );

    let mut rng = StdRng::from_entropy();
    let report = PdfGenerator::new(&deps.folders.generated_output)
        .generate(source, count, Local::now().date_naive(), &mut rng)
        .await?;

    if report.generated_count() == 0 {
        let details = report
            .items
            .iter()
            .find_map(|item| item.error.clone())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(AdvisoryError::NothingGenerated { details });
    }

    Ok(report)
}
