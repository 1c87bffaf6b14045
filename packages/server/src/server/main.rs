// Main entry point for the advisory intake API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Advisory Intake API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        documents = %config.folders.documents.display(),
        reference = %config.folders.reference.display(),
        templates = %config.folders.templates.display(),
        output = %config.folders.generated_output.display(),
        "Configuration loaded"
    );

    let deps = Arc::new(ServerDeps::from_config(&config));

    let missing = deps.templates.missing_files();
    if !missing.is_empty() {
        tracing::warn!(
            missing = missing.len(),
            folder = %deps.templates.folder().display(),
            "Some agreement templates are missing; generation will fail for those archetypes"
        );
        for path in &missing {
            tracing::debug!(path = %path.display(), "Missing template");
        }
    }

    // Build application
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
