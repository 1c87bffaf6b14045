//! Synthetic agreement generator.
//!
//! Fills blank archetype templates with random but plausible values so the
//! intake pipeline has realistic documents to scan.

pub mod form_fill;
pub mod values;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

pub use form_fill::{fill_form, read_text_fields, value_for_field, FillRule, FilledForm, FILL_RULES};
pub use values::GeneratedAgreement;

use crate::domains::advisory::models::{TemplateCatalog, TemplateConfig};

/// Largest batch a single request may ask for.
pub const MAX_BATCH: u32 = 1000;

/// Label used when a caller-supplied template stands in for the archetypes.
const CUSTOM_TEMPLATE_LABEL: &str = "Custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Generated,
    Failed,
}

/// Outcome of one requested document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub index: u32,
    pub status: ItemStatus,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<GeneratedAgreement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub items: Vec<GeneratedItem>,
}

impl GenerationReport {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedItem> {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Generated)
    }

    pub fn generated_count(&self) -> usize {
        self.generated().count()
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.generated()
            .filter_map(|item| item.file_path.clone())
            .collect()
    }
}

/// Where each item's blank form comes from.
pub enum TemplateSource<'a> {
    /// Random archetype per item, read from the catalog folder
    Catalog(&'a TemplateCatalog),
    /// One caller-supplied blank for every item
    Supplied(&'a [u8]),
}

pub struct PdfGenerator {
    output_folder: PathBuf,
}

impl PdfGenerator {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Generate `count` documents. Items fail independently; only an unusable
    /// output folder fails the whole batch.
    pub async fn generate<R: Rng + ?Sized>(
        &self,
        source: TemplateSource<'_>,
        count: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<GenerationReport> {
        tokio::fs::create_dir_all(&self.output_folder)
            .await
            .with_context(|| format!("failed to create {}", self.output_folder.display()))?;

        let mut report = GenerationReport::default();
        for index in 0..count {
            let item = match &source {
                TemplateSource::Catalog(catalog) => match catalog.choose(rng) {
                    Some(template) => {
                        let path = catalog.path_for(template);
                        let values = GeneratedAgreement::random(template, today, rng);
                        self.generate_one(index, &template.label(), values, TemplateBytes::File(&path))
                            .await
                    }
                    None => failed(index, "", "template catalog is empty"),
                },
                TemplateSource::Supplied(bytes) => {
                    let template = supplied_shape(rng);
                    let values = GeneratedAgreement::random(&template, today, rng);
                    self.generate_one(index, CUSTOM_TEMPLATE_LABEL, values, TemplateBytes::Memory(bytes))
                        .await
                }
            };

            if let Some(error) = &item.error {
                warn!(index, template = %item.template, error = %error, "Failed to generate agreement");
            }
            report.items.push(item);
        }

        info!(
            requested = count,
            generated = report.generated_count(),
            folder = %self.output_folder.display(),
            "Generation batch complete"
        );
        Ok(report)
    }

    async fn generate_one(
        &self,
        index: u32,
        label: &str,
        values: GeneratedAgreement,
        template: TemplateBytes<'_>,
    ) -> GeneratedItem {
        match self.write_one(index, label, &values, template).await {
            Ok(path) => GeneratedItem {
                index,
                status: ItemStatus::Generated,
                template: label.to_string(),
                file_path: Some(path.to_string_lossy().into_owned()),
                values: Some(values),
                error: None,
            },
            Err(e) => failed(index, label, format!("{:#}", e)),
        }
    }

    async fn write_one(
        &self,
        index: u32,
        label: &str,
        values: &GeneratedAgreement,
        template: TemplateBytes<'_>,
    ) -> Result<PathBuf> {
        let filled = match template {
            TemplateBytes::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("template file missing: {}", path.display()))?;
                fill_form(&bytes, values)?
            }
            TemplateBytes::Memory(bytes) => fill_form(bytes, values)?,
        };

        let path = self.output_folder.join(output_filename(label, values, index));
        tokio::fs::write(&path, &filled.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

enum TemplateBytes<'a> {
    File(&'a Path),
    Memory(&'a [u8]),
}

/// `{Archetype}_{ClientSurname}_{AccountNumber}_{index}.pdf`
pub fn output_filename(label: &str, values: &GeneratedAgreement, index: u32) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        label, values.client_last_name, values.account_number, index
    )
}

fn failed(index: u32, label: &str, error: impl Into<String>) -> GeneratedItem {
    GeneratedItem {
        index,
        status: ItemStatus::Failed,
        template: label.to_string(),
        file_path: None,
        values: None,
        error: Some(error.into()),
    }
}

// A supplied blank has no known archetype; draw one so fee and holder values vary.
fn supplied_shape<R: Rng + ?Sized>(rng: &mut R) -> TemplateConfig {
    let catalog = TemplateCatalog::standard(PathBuf::new());
    catalog
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| catalog.templates()[0].clone())
}
