//! Batch transform orchestration
//!
//! Applies one operation to every item of a batch on a bounded set of blocking
//! workers. Output order always matches input order, and when several items fail the
//! reported failure is the one with the lowest index.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use pixpack_core::constants::{
    CONVERT_JPEG_QUALITY, RECOMPRESS_JPEG_QUALITY, SINGLE_RESIZE_JPEG_QUALITY,
};
use pixpack_core::{AppError, ImageItem, ResizeTarget};

use crate::codec::{CodecError, EncodeParams, ImageCodec, OutputFormat};

/// Transform requested for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// PNG to JPEG.
    Convert,
    /// Re-encode in the same format.
    Compress,
    /// Resize each item to its index-aligned target, keeping the format.
    Resize(Vec<ResizeTarget>),
    /// Resize each item to its index-aligned target, then convert to JPEG.
    Process(Vec<ResizeTarget>),
}

impl BatchOperation {
    pub fn name(&self) -> &'static str {
        match self {
            BatchOperation::Convert => "convert",
            BatchOperation::Compress => "compress",
            BatchOperation::Resize(_) => "resize",
            BatchOperation::Process(_) => "process",
        }
    }

    fn targets(&self) -> Option<&[ResizeTarget]> {
        match self {
            BatchOperation::Resize(targets) | BatchOperation::Process(targets) => Some(targets),
            BatchOperation::Convert | BatchOperation::Compress => None,
        }
    }

    /// Split into one step per item.
    fn into_steps(self, items: usize) -> Result<Vec<ItemStep>, BatchError> {
        if let Some(targets) = self.targets() {
            if targets.len() != items {
                return Err(BatchError::TargetMismatch {
                    items,
                    targets: targets.len(),
                });
            }
        }

        Ok(match self {
            BatchOperation::Convert => vec![ItemStep::Convert; items],
            BatchOperation::Compress => vec![ItemStep::Compress; items],
            BatchOperation::Resize(targets) => targets.into_iter().map(ItemStep::Resize).collect(),
            BatchOperation::Process(targets) => {
                targets.into_iter().map(ItemStep::Process).collect()
            }
        })
    }
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Work applied to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemStep {
    Convert,
    Compress,
    Resize(ResizeTarget),
    Process(ResizeTarget),
    SingleResize(ResizeTarget),
}

impl ItemStep {
    fn apply(self, codec: &dyn ImageCodec, item: ImageItem) -> Result<ImageItem, CodecError> {
        let raster = codec.decode(&item.bytes)?;

        let (raster, params) = match self {
            ItemStep::Convert => (raster, EncodeParams::jpeg(CONVERT_JPEG_QUALITY)),
            ItemStep::Compress => (raster, same_format_params(&item)?),
            ItemStep::Resize(target) => (codec.resize(&raster, target), same_format_params(&item)?),
            ItemStep::Process(target) => (
                codec.resize(&raster, target),
                EncodeParams::jpeg(CONVERT_JPEG_QUALITY),
            ),
            ItemStep::SingleResize(target) => (
                codec.resize(&raster, target),
                EncodeParams::jpeg(SINGLE_RESIZE_JPEG_QUALITY),
            ),
        };

        let encoded = codec.encode(&raster, params)?;

        let filename = match self {
            ItemStep::Convert => convert_filename(&item.filename),
            _ => item.filename,
        };

        Ok(ImageItem::new(
            filename,
            params.format().to_mime_type(),
            encoded,
        ))
    }
}

fn same_format_params(item: &ImageItem) -> Result<EncodeParams, CodecError> {
    OutputFormat::from_content_type(&item.content_type)
        .map(|format| EncodeParams::same_format(format, RECOMPRESS_JPEG_QUALITY))
        .ok_or_else(|| CodecError::UnsupportedFormat(item.content_type.clone()))
}

/// Filename of a PNG converted to JPEG: a trailing `png` (any case) becomes `jpeg`.
///
/// Names without that suffix just get `jpeg` appended.
pub fn convert_filename(name: &str) -> String {
    let bytes = name.as_bytes();
    let stem = if bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b"png") {
        &name[..name.len() - 3]
    } else {
        name
    };
    format!("{}jpeg", stem)
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to {stage} item {index} ({filename}): {source}")]
    Item {
        index: usize,
        filename: String,
        stage: &'static str,
        #[source]
        source: CodecError,
    },

    #[error("transform worker for item {index} failed: {message}")]
    Worker { index: usize, message: String },

    #[error("got {targets} resize targets for {items} items")]
    TargetMismatch { items: usize, targets: usize },
}

impl BatchError {
    fn item(index: usize, filename: String, source: CodecError) -> Self {
        BatchError::Item {
            index,
            filename,
            stage: source.stage(),
            source,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            BatchError::Item { index, .. } | BatchError::Worker { index, .. } => Some(*index),
            BatchError::TargetMismatch { .. } => None,
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Item {
                source: CodecError::Decode(_),
                ..
            } => AppError::ImageProcessing(err.to_string()),
            BatchError::Item { .. } => AppError::ImageEncoding(err.to_string()),
            BatchError::Worker { .. } | BatchError::TargetMismatch { .. } => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

/// Runs transforms on blocking workers, at most `concurrency` at a time.
#[derive(Clone)]
pub struct BatchTransformer {
    codec: Arc<dyn ImageCodec>,
    concurrency: usize,
}

impl BatchTransformer {
    pub fn new(codec: Arc<dyn ImageCodec>, concurrency: usize) -> Self {
        Self {
            codec,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Apply `operation` to every item.
    ///
    /// Returns the transformed items in input order, or the error of the
    /// lowest-indexed failing item. Items already in flight when a failure is
    /// observed are allowed to finish; their results are dropped.
    pub async fn run(
        &self,
        items: Vec<ImageItem>,
        operation: BatchOperation,
    ) -> Result<Vec<ImageItem>, BatchError> {
        let started = Instant::now();
        let name = operation.name();
        let count = items.len();
        let steps = operation.into_steps(count)?;

        let results = stream::iter(items.into_iter().zip(steps).enumerate())
            .map(|(index, (item, step))| self.spawn_step(index, item, step))
            .buffered(self.concurrency)
            .try_collect::<Vec<_>>()
            .await;

        match &results {
            Ok(_) => tracing::info!(
                operation = name,
                items = count,
                duration_ms = started.elapsed().as_millis() as u64,
                "Batch transformed"
            ),
            Err(e) => tracing::warn!(
                operation = name,
                items = count,
                error = %e,
                "Batch transform failed"
            ),
        }

        results
    }

    /// Resize one image and encode it as JPEG.
    ///
    /// With no target the item is returned untouched without any codec call.
    pub async fn resize_single(
        &self,
        item: ImageItem,
        target: Option<ResizeTarget>,
    ) -> Result<ImageItem, BatchError> {
        match target {
            Some(target) => self.spawn_step(0, item, ItemStep::SingleResize(target)).await,
            None => {
                tracing::debug!(filename = %item.filename, "No resize requested, passing through");
                Ok(item)
            }
        }
    }

    async fn spawn_step(
        &self,
        index: usize,
        item: ImageItem,
        step: ItemStep,
    ) -> Result<ImageItem, BatchError> {
        let codec = Arc::clone(&self.codec);
        let filename = item.filename.clone();
        let input_size = item.len();

        let output = tokio::task::spawn_blocking(move || step.apply(codec.as_ref(), item))
            .await
            .map_err(|e| BatchError::Worker {
                index,
                message: e.to_string(),
            })?
            .map_err(|source| BatchError::item(index, filename, source))?;

        tracing::debug!(
            index,
            filename = %output.filename,
            input_size,
            output_size = output.len(),
            content_type = %output.content_type,
            "Item transformed"
        );

        Ok(output)
    }
}
