//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixpack-api --test images_test`.

pub mod archive;
pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum_test::TestServer;
use image::DynamicImage;
use pixpack_api::setup::routes;
use pixpack_api::AppState;
use pixpack_core::{Config, ResizeTarget};
use pixpack_processing::{CodecError, EncodeParams, ImageCodec, ImageRsCodec};

/// Test application: server plus a handle on codec usage.
pub struct TestApp {
    pub server: TestServer,
    pub codec: Arc<CountingCodec>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of decode, resize and encode calls made so far.
    pub fn codec_calls(&self) -> usize {
        self.codec.calls.load(Ordering::SeqCst)
    }
}

/// Real codec that counts every call.
#[derive(Default)]
pub struct CountingCodec {
    inner: ImageRsCodec,
    calls: AtomicUsize,
}

impl ImageCodec for CountingCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.decode(bytes)
    }

    fn resize(&self, raster: &DynamicImage, target: ResizeTarget) -> DynamicImage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resize(raster, target)
    }

    fn encode(&self, raster: &DynamicImage, params: EncodeParams) -> Result<Vec<u8>, CodecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.encode(raster, params)
    }
}

pub fn test_config() -> Config {
    Config {
        transform_concurrency: 2,
        ..Config::default()
    }
}

/// Setup test app with the default limits.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: Config) -> TestApp {
    let codec = Arc::new(CountingCodec::default());
    let state = Arc::new(AppState::new(config.clone(), codec.clone()));
    let app = routes::setup_routes(&config, state);

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, codec }
}
