//! Upload materialization
//!
//! Turns upload handles into in-memory `ImageItem`s: open, sniff, check the sniffed
//! type against the route's allow-list, then read the rest. All-or-nothing.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use pixpack_core::{AllowedContentTypes, AppError, ImageItem};

use crate::sniff::{sniff, SniffError};

/// Something an upload can be read from.
pub trait FileSource {
    /// Client supplied filename. Carried through, never trusted for type detection.
    fn filename(&self) -> &str;

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>>;
}

/// Upload buffered by the multipart extractor.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

impl FileSource for UploadedFile {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }
}

/// Upload spooled to disk.
#[derive(Debug, Clone)]
pub struct DiskFile {
    filename: String,
    path: PathBuf,
}

impl DiskFile {
    pub fn new(filename: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            filename: filename.into(),
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FileSource for DiskFile {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("failed to open file {index} ({filename})")]
    Open {
        index: usize,
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to detect content type of file {index} ({filename})")]
    ContentTypeDetection {
        index: usize,
        filename: String,
        #[source]
        source: SniffError,
    },

    #[error("file type {content_type} not allowed, only allow [{allowed}]")]
    UnsupportedContentType {
        index: usize,
        filename: String,
        content_type: String,
        allowed: AllowedContentTypes,
    },

    #[error("failed to read file {index} ({filename})")]
    Read {
        index: usize,
        filename: String,
        #[source]
        source: io::Error,
    },
}

impl MaterializeError {
    pub fn index(&self) -> usize {
        match self {
            MaterializeError::Open { index, .. }
            | MaterializeError::ContentTypeDetection { index, .. }
            | MaterializeError::UnsupportedContentType { index, .. }
            | MaterializeError::Read { index, .. } => *index,
        }
    }
}

impl From<MaterializeError> for AppError {
    fn from(err: MaterializeError) -> Self {
        match err {
            MaterializeError::UnsupportedContentType {
                content_type,
                allowed,
                ..
            } => AppError::UnsupportedContentType {
                content_type,
                allowed: allowed.to_string(),
            },
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// Materialize `sources` in order.
///
/// Stops at the first failing source; earlier items are discarded.
pub fn materialize<S: FileSource>(
    sources: &[S],
    allowed: &AllowedContentTypes,
) -> Result<Vec<ImageItem>, MaterializeError> {
    let mut items = Vec::with_capacity(sources.len());

    for (index, source) in sources.iter().enumerate() {
        let filename = source.filename();

        let reader = source.open().map_err(|source| MaterializeError::Open {
            index,
            filename: filename.to_string(),
            source,
        })?;

        let sniffed = sniff(reader).map_err(|source| MaterializeError::ContentTypeDetection {
            index,
            filename: filename.to_string(),
            source,
        })?;

        if !allowed.contains(sniffed.content_type) {
            tracing::debug!(
                index,
                filename = %filename,
                content_type = %sniffed.content_type,
                "Rejected upload with disallowed content type"
            );
            return Err(MaterializeError::UnsupportedContentType {
                index,
                filename: filename.to_string(),
                content_type: sniffed.content_type.to_string(),
                allowed: allowed.clone(),
            });
        }

        let mut data = Vec::new();
        let mut reader = sniffed.reader;
        reader
            .read_to_end(&mut data)
            .map_err(|source| MaterializeError::Read {
                index,
                filename: filename.to_string(),
                source,
            })?;

        items.push(ImageItem::new(filename, sniffed.content_type, data));
    }

    Ok(items)
}
