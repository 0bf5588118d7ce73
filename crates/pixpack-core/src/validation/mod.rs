//! Request validation
//!
//! Pure, syntactic checks over already-parsed requests. Nothing here opens or reads
//! upload bytes; content checks happen in the materializer.

mod request;

pub use request::{
    parse_dimension, validate_batch_resize, validate_files, validate_single_resize,
    ValidationError,
};
