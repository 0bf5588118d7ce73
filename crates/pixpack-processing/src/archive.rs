//! ZIP archive writer
//!
//! Writes one deflated entry per item, in item order, straight into a non-seekable
//! sink. Entries use data descriptors, so nothing is buffered beyond the entry being
//! written.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use chrono::{Datelike, Timelike};
use pixpack_core::ImageItem;
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;
use tokio_util::io::{ReaderStream, SyncIoBridge};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Capacity of the in-memory pipe between the archive worker and the response body.
const PIPE_CAPACITY: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to add entry {index} ({name}) to ZIP: {source}")]
    Entry {
        index: usize,
        name: String,
        #[source]
        source: ZipError,
    },

    #[error("failed to write entry {index} ({name}) to ZIP: {source}")]
    Write {
        index: usize,
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to finalize ZIP archive: {0}")]
    Finish(#[source] ZipError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entries: usize,
    /// Sum of entry sizes before compression.
    pub uncompressed_bytes: u64,
}

/// Base name of `filename`, or `fallback` when nothing usable is left.
fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    // Clients on Windows send backslash separated paths
    let filename = filename.rsplit('\\').next().unwrap_or(filename);
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// `name.ext` -> `name (n).ext`
fn numbered(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &name[..dot], n, &name[dot..]),
        _ => format!("{} ({})", name, n),
    }
}

/// Entry names for `items`: sanitized, in order, unique within the archive.
pub fn archive_entry_names(items: &[ImageItem]) -> Vec<String> {
    let mut used = HashSet::with_capacity(items.len());

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let base = sanitize_archive_filename(&item.filename, &format!("image_{}", index));
            let mut name = base.clone();
            let mut n = 1;
            while used.contains(&name) {
                name = numbered(&base, n);
                n += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn entry_timestamp() -> DateTime {
    let now = chrono::Local::now();
    u16::try_from(now.year())
        .ok()
        .and_then(|year| {
            DateTime::from_date_and_time(
                year,
                now.month() as u8,
                now.day() as u8,
                now.hour() as u8,
                now.minute() as u8,
                now.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

/// Write `items` as a ZIP archive into `sink`.
///
/// The archive is finalized on every path, including after a failed entry; in that
/// case the entry error is returned and the finalize result is only logged.
pub fn write_archive<W: Write>(
    items: &[ImageItem],
    sink: W,
) -> Result<ArchiveSummary, ArchiveError> {
    let names = archive_entry_names(items);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(entry_timestamp())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new_stream(sink);

    let written = items
        .iter()
        .zip(&names)
        .enumerate()
        .try_fold(0u64, |total, (index, (item, name))| {
            zip.start_file(name.as_str(), options)
                .map_err(|source| ArchiveError::Entry {
                    index,
                    name: name.clone(),
                    source,
                })?;
            zip.write_all(&item.bytes)
                .map_err(|source| ArchiveError::Write {
                    index,
                    name: name.clone(),
                    source,
                })?;
            Ok(total + item.len() as u64)
        });

    let finished = zip.finish();

    match (written, finished) {
        (Ok(uncompressed_bytes), Ok(_)) => Ok(ArchiveSummary {
            entries: items.len(),
            uncompressed_bytes,
        }),
        (Ok(_), Err(e)) => Err(ArchiveError::Finish(e)),
        (Err(e), finished) => {
            if let Err(finish_err) = finished {
                tracing::debug!(error = %finish_err, "Failed to finalize ZIP after entry error");
            }
            Err(e)
        }
    }
}

/// Archive being produced by a blocking worker.
pub struct ArchiveStream {
    /// Archive bytes as they are written.
    pub body: ReaderStream<DuplexStream>,
    /// Outcome of the writer; the body ends early if this fails.
    pub writer: JoinHandle<Result<ArchiveSummary, ArchiveError>>,
}

/// Start writing `items` as a ZIP archive on a blocking worker.
///
/// Must be called from within a Tokio runtime. Dropping the body makes the writer
/// fail with a broken pipe and stop.
pub fn stream_archive(items: Vec<ImageItem>) -> ArchiveStream {
    let (writer_half, reader_half) = tokio::io::duplex(PIPE_CAPACITY);
    let mut bridge = SyncIoBridge::new(writer_half);

    let writer = tokio::task::spawn_blocking(move || {
        let result = write_archive(&items, &mut bridge);
        if let Err(e) = bridge.shutdown() {
            tracing::debug!(error = %e, "Failed to close archive pipe");
        }

        match &result {
            Ok(summary) => tracing::info!(
                entries = summary.entries,
                uncompressed_bytes = summary.uncompressed_bytes,
                "Archive streamed"
            ),
            Err(e) => tracing::error!(error = %e, "Archive stream aborted"),
        }
        result
    });

    ArchiveStream {
        body: ReaderStream::new(reader_half),
        writer,
    }
}
