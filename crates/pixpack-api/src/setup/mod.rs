//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use pixpack_core::Config;
use pixpack_processing::ImageRsCodec;

use crate::state::AppState;

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        transform_concurrency = config.transform_concurrency,
        "Configuration loaded and validated successfully"
    );

    let state = Arc::new(AppState::new(config.clone(), Arc::new(ImageRsCodec::new())));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
