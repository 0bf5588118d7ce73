//! Pixpack API Library
//!
//! This crate provides the HTTP handlers, multipart extraction, and application setup.

mod extract;
mod handlers;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
