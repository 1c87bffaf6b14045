//! Server dependencies for routes and actions (using traits for testability)
//!
//! This module provides the central dependency container shared by every handler.
//! External services sit behind trait abstractions so tests can swap them.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AdvisoryFolders, Config};
use crate::domains::advisory::models::TemplateCatalog;
use crate::domains::advisory::{
    AgreementAnalyzer, DocumentAnalyzer, DocumentScanner, ExtractionCache, MemoryExtractionCache,
    OverrideStore,
};
use crate::kernel::{BaseAI, ExtractionThrottle, OpenAIDocumentAI, UnconfiguredAI};

/// Server dependencies accessible to routes and domain actions
#[derive(Clone)]
pub struct ServerDeps {
    /// Multimodal model used for extraction
    pub ai: Arc<dyn BaseAI>,
    pub cache: Arc<dyn ExtractionCache>,
    pub scanner: Arc<DocumentScanner>,
    pub overrides: Arc<OverrideStore>,
    pub templates: Arc<TemplateCatalog>,
    pub folders: AdvisoryFolders,
}

impl ServerDeps {
    /// Wire the extraction pipeline around an AI implementation and a cache.
    pub fn new(
        ai: Arc<dyn BaseAI>,
        cache: Arc<dyn ExtractionCache>,
        throttle: ExtractionThrottle,
        folders: AdvisoryFolders,
    ) -> Self {
        let analyzer: Arc<dyn DocumentAnalyzer> = Arc::new(
            AgreementAnalyzer::new(ai.clone(), throttle).with_reference_folder(&folders.reference),
        );

        Self {
            scanner: Arc::new(DocumentScanner::new(analyzer, cache.clone())),
            templates: Arc::new(TemplateCatalog::standard(&folders.templates)),
            overrides: Arc::new(OverrideStore::new()),
            ai,
            cache,
            folders,
        }
    }

    /// Production wiring from configuration.
    pub fn from_config(config: &Config) -> Self {
        let ai: Arc<dyn BaseAI> = match &config.openai_api_key {
            Some(key) => Arc::new(OpenAIDocumentAI::from_key(
                key,
                config.openai_base_url.as_deref(),
                &config.ai_model,
                config.throttle.call_timeout,
            )),
            None => {
                warn!("OPENAI_API_KEY not set; every extraction will return Error records");
                Arc::new(UnconfiguredAI)
            }
        };

        info!(
            model = %config.ai_model,
            max_concurrent = config.throttle.max_concurrent,
            min_spacing_ms = config.throttle.min_spacing.as_millis() as u64,
            call_timeout_secs = config.throttle.call_timeout.as_secs(),
            "Extraction throttle configured"
        );

        Self::new(
            ai,
            Arc::new(MemoryExtractionCache::new()),
            ExtractionThrottle::new(config.throttle.clone()),
            config.folders.clone(),
        )
    }
}
