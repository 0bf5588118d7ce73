//! Data models for the application
//!
//! Everything here lives for the duration of a single request; nothing is persisted.

mod image;
mod resize;

pub use image::*;
pub use resize::*;
