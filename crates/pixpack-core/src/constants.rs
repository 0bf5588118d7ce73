//! Application-wide constants.

pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
pub const CONTENT_TYPE_ZIP: &str = "application/zip";

/// Number of leading bytes inspected when sniffing an upload.
pub const SNIFF_LEN: usize = 512;

/// Largest accepted resize dimension on either axis.
pub const MAX_DIMENSION: u32 = 16_384;

/// Multipart field names.
pub mod fields {
    pub const FILE: &str = "file";
    pub const FILES: &str = "files[]";
    pub const HEIGHTS: &str = "height[]";
    pub const WIDTHS: &str = "width[]";
    pub const RESIZE_HEIGHT: &str = "resizeHeight";
    pub const RESIZE_WIDTH: &str = "resizeWidth";
}

/// JPEG quality used when converting PNG uploads.
pub const CONVERT_JPEG_QUALITY: u8 = 100;
/// JPEG quality used by the single-image resize endpoint.
pub const SINGLE_RESIZE_JPEG_QUALITY: u8 = 96;
/// JPEG quality used when re-encoding JPEG uploads in place.
pub const RECOMPRESS_JPEG_QUALITY: u8 = 95;
