use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use pixpack_core::constants::CONTENT_TYPE_ZIP;
use pixpack_core::{AppError, ImageItem};
use pixpack_processing::stream_archive;

use crate::error::HttpAppError;

const ARCHIVE_FILENAME: &str = "images.zip";

/// `201` response whose body is the ZIP archive of `items`, written while it is sent.
///
/// Once this returns the status is committed; a failure while writing only cuts the
/// body short and is logged by the archive worker.
pub fn archive_response(items: Vec<ImageItem>) -> Result<Response, HttpAppError> {
    let archive = stream_archive(items);

    Response::builder()
        .status(StatusCode::CREATED)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_ZIP)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILENAME),
        )
        .body(Body::from_stream(archive.body))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build archive response");
            AppError::Internal(e.to_string()).into()
        })
}
