//! Pixpack Core Library
//!
//! This crate provides the domain models, error types, configuration, and request
//! validation shared by the processing pipeline and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AllowedContentTypes, ImageItem, ResizeTarget};
pub use validation::ValidationError;
