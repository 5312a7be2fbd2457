//! persona-flow - Learner Persona & Performance Insight Service
//!
//! HTTP API serving performance predictions, persona assignments, and
//! rule-based recommendations from pre-trained model artifacts.
//!
//! # Usage
//!
//! ```bash
//! # Run with artifacts from ./artifacts (default)
//! cargo run --release
//!
//! # Run with a specific artifact directory and schema
//! cargo run --release -- --artifacts /var/lib/persona-flow --schema v1
//!
//! # Run with deterministic built-in models (no artifacts needed)
//! cargo run --release -- --builtin-models
//! ```
//!
//! # Environment Variables
//!
//! - `PERSONA_FLOW_CONFIG`: Path to the TOML config file
//! - `PERSONA_FLOW_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use persona_flow::api::{create_app, ApiState};
use persona_flow::config::{self, ServiceConfig};
use persona_flow::inference::{ArtifactBundle, ModelRegistry};
use persona_flow::types::SchemaVersion;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "persona-flow")]
#[command(about = "Learner Persona & Performance Insight Service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default from config: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the model artifact directory
    #[arg(long)]
    artifacts: Option<String>,

    /// Override the behavioral schema version (v1 or v2)
    #[arg(long)]
    schema: Option<SchemaVersion>,

    /// Use deterministic built-in models instead of loading artifacts.
    /// Intended for demos and smoke tests only.
    #[arg(long)]
    builtin_models: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Load service configuration
    let service_config = ServiceConfig::load();
    let schema = args.schema.unwrap_or(service_config.models.schema);
    let artifact_dir = args
        .artifacts
        .clone()
        .unwrap_or_else(|| service_config.models.artifact_dir.clone());
    let server_addr = args
        .addr
        .clone()
        .unwrap_or_else(|| service_config.server.addr.clone());
    config::init(service_config);

    info!("persona-flow - Learner Persona & Performance Insight Service");
    info!("Schema: {} | Artifacts: {}", schema, artifact_dir);

    // Load models — any failure here is fatal; the process must not start
    // serving with a partial model set.
    let registry = if args.builtin_models {
        info!("Using built-in models (--builtin-models)");
        ModelRegistry::builtin(schema)
    } else {
        let bundle = ArtifactBundle::load(Path::new(&artifact_dir), schema)
            .with_context(|| format!("failed to load model artifacts from {artifact_dir}"))?;
        ModelRegistry::from_artifacts(bundle)
    };
    info!(
        "Models ready: {} personas, {} clusters",
        registry.persona_count(),
        registry.clusterer().centroids().len()
    );

    // Build and serve the app
    let state = ApiState::new(Arc::new(registry));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("failed to bind {server_addr}"))?;
    info!("Listening on http://{server_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received Ctrl+C, shutting down...");
}
