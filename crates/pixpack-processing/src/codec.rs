//! Image codec service
//!
//! Decode, resize and encode behind the `ImageCodec` trait so the batch orchestrator
//! can run against the `image` crate in production and a recording mock in tests.

use std::borrow::Cow;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::DynamicImage;
use pixpack_core::constants::{CONTENT_TYPE_JPEG, CONTENT_TYPE_PNG};
use pixpack_core::ResizeTarget;

/// Cubic resampling, used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Encoded formats the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            CONTENT_TYPE_JPEG => Some(OutputFormat::Jpeg),
            CONTENT_TYPE_PNG => Some(OutputFormat::Png),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => CONTENT_TYPE_JPEG,
            OutputFormat::Png => CONTENT_TYPE_PNG,
        }
    }
}

/// PNG deflate effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    Fast,
    /// Moderate level, between fast and best.
    #[default]
    Default,
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParams {
    Jpeg { quality: u8 },
    Png { compression: PngCompression },
}

impl EncodeParams {
    pub fn jpeg(quality: u8) -> Self {
        EncodeParams::Jpeg {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn png() -> Self {
        EncodeParams::Png {
            compression: PngCompression::Default,
        }
    }

    /// Re-encode parameters that keep the input's format.
    pub fn same_format(format: OutputFormat, jpeg_quality: u8) -> Self {
        match format {
            OutputFormat::Jpeg => EncodeParams::jpeg(jpeg_quality),
            OutputFormat::Png => EncodeParams::png(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            EncodeParams::Jpeg { .. } => OutputFormat::Jpeg,
            EncodeParams::Png { .. } => OutputFormat::Png,
        }
    }
}

/// Codec stage that failed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

impl CodecError {
    pub fn stage(&self) -> &'static str {
        match self {
            CodecError::Decode(_) => "decode",
            CodecError::Encode(_) => "encode",
            CodecError::UnsupportedFormat(_) => "unsupported_format",
        }
    }
}

pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Resize to exactly `target`, ignoring aspect ratio.
    fn resize(&self, raster: &DynamicImage, target: ResizeTarget) -> DynamicImage;

    fn encode(&self, raster: &DynamicImage, params: EncodeParams) -> Result<Vec<u8>, CodecError>;
}

/// Production codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for ImageRsCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn resize(&self, raster: &DynamicImage, target: ResizeTarget) -> DynamicImage {
        raster.resize_exact(target.width(), target.height(), RESIZE_FILTER)
    }

    fn encode(&self, raster: &DynamicImage, params: EncodeParams) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();

        match params {
            EncodeParams::Jpeg { quality } => {
                // JPEG has no alpha channel
                let rgb = raster.to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, quality)
                    .encode_image(&rgb)
                    .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {}", e)))?;
            }
            EncodeParams::Png { compression } => {
                let encoder =
                    PngEncoder::new_with_quality(&mut buffer, compression.into(), PngFilter::Adaptive);
                png_compatible(raster)
                    .write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(format!("PNG encode failed: {}", e)))?;
            }
        }

        Ok(buffer)
    }
}

/// PNG stores integer samples only.
fn png_compatible(raster: &DynamicImage) -> Cow<'_, DynamicImage> {
    match raster {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(raster.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(raster.to_rgba16())),
        _ => Cow::Borrowed(raster),
    }
}
