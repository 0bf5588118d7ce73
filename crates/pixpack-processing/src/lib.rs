//! Pixpack Processing Library
//!
//! The image pipeline behind the HTTP API: content sniffing, upload
//! materialization, the codec service, batch transforms and ZIP archive streaming.

pub mod archive;
pub mod batch;
pub mod codec;
pub mod materialize;
pub mod sniff;

pub use archive::{
    archive_entry_names, stream_archive, write_archive, ArchiveError, ArchiveStream,
    ArchiveSummary,
};
pub use batch::{convert_filename, BatchError, BatchOperation, BatchTransformer};
pub use codec::{CodecError, EncodeParams, ImageCodec, ImageRsCodec, OutputFormat, PngCompression};
pub use materialize::{materialize, DiskFile, FileSource, MaterializeError, UploadedFile};
pub use sniff::{detect_content_type, sniff, SniffError, Sniffed};
