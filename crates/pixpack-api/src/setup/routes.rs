//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pixpack_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, images};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_body_size_bytes = config.max_body_size_bytes,
        "Request limits enabled"
    );

    Router::new()
        .route("/", post(images::resize_image))
        .route("/png-to-jpeg", post(images::convert_images))
        .route("/compress", post(images::compress_images))
        .route("/resize", post(images::resize_images))
        .route("/process", post(images::process_images))
        .route("/health", get(health::liveness_check))
        // The body limit below covers multipart bodies too
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_body_size_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
