use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::kernel::ThrottlePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub folders: AdvisoryFolders,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub ai_model: String,
    pub throttle: ThrottlePolicy,
}

/// Filesystem layout the pipeline reads from and writes to.
#[derive(Debug, Clone)]
pub struct AdvisoryFolders {
    /// Agreements to scan; also the root `view-pdf` may serve from
    pub documents: PathBuf,
    /// Reference (filled example) agreements attached to extraction calls
    pub reference: PathBuf,
    /// The 16 archetype templates
    pub templates: PathBuf,
    /// Where synthetic agreements are written
    pub generated_output: PathBuf,
}

impl AdvisoryFolders {
    /// Lay every folder out under one root, the way tests and local runs do.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let documents = root.join("advisory");
        Self {
            reference: root.join("reference"),
            templates: root.join("templates"),
            generated_output: documents.clone(),
            documents,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let documents = PathBuf::from(
            env::var("DOCUMENTS_FOLDER").unwrap_or_else(|_| "./data/advisory".to_string()),
        );
        let generated_output = env::var("GENERATED_OUTPUT_FOLDER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| documents.clone());

        let defaults = ThrottlePolicy::default();
        let throttle = ThrottlePolicy {
            max_concurrent: parse_or("AI_MAX_CONCURRENT", defaults.max_concurrent)?,
            min_spacing: Duration::from_millis(parse_or(
                "AI_MIN_SPACING_MS",
                defaults.min_spacing.as_millis() as u64,
            )?),
            call_timeout: Duration::from_secs(parse_or(
                "AI_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )?),
        };

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            folders: AdvisoryFolders {
                documents,
                reference: PathBuf::from(
                    env::var("REFERENCE_FOLDER").unwrap_or_else(|_| "./data/reference".to_string()),
                ),
                templates: PathBuf::from(
                    env::var("TEMPLATES_FOLDER").unwrap_or_else(|_| "./data/templates".to_string()),
                ),
                generated_output,
            },
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            throttle,
        })
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number")),
        Err(_) => Ok(default),
    }
}
