//! Request extraction
//!
//! Multipart bodies are read once into a `MultipartForm`, then narrowed into the typed
//! request of each route. Validation happens afterwards, in the handlers.

mod multipart;
mod requests;

pub use multipart::MultipartForm;
pub use requests::{FilesRequest, ResizeFilesRequest, SingleImageRequest};
