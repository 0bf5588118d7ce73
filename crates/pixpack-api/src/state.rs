//! Application state shared by all handlers.

use std::sync::Arc;

use pixpack_core::Config;
use pixpack_processing::{BatchTransformer, ImageCodec};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub transformer: BatchTransformer,
}

impl AppState {
    pub fn new(config: Config, codec: Arc<dyn ImageCodec>) -> Self {
        let transformer = BatchTransformer::new(codec, config.transform_concurrency);
        Self {
            config,
            transformer,
        }
    }
}
