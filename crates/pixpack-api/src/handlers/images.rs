//! Image endpoints
//!
//! Every route runs the same pipeline: extract, validate, materialize (sniff and
//! allow-list), transform, respond. Nothing is written to the client before the
//! transform succeeded for every item.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use pixpack_core::constants::fields;
use pixpack_core::validation::{validate_batch_resize, validate_files, validate_single_resize};
use pixpack_core::{AllowedContentTypes, AppError, ValidationError};
use pixpack_processing::{materialize, BatchOperation, UploadedFile};

use super::archive::archive_response;
use crate::error::HttpAppError;
use crate::extract::{FilesRequest, MultipartForm, ResizeFilesRequest, SingleImageRequest};
use crate::state::AppState;

/// Materialize, transform and archive a validated batch.
async fn run_batch(
    state: &AppState,
    files: Vec<UploadedFile>,
    allowed: AllowedContentTypes,
    operation: BatchOperation,
) -> Result<Response, HttpAppError> {
    let items = materialize(&files, &allowed)?;
    drop(files);

    let items = state.transformer.run(items, operation).await?;
    archive_response(items)
}

/// Resize one PNG and return it as JPEG.
///
/// With `resizeHeight` and `resizeWidth` both zero (or absent) the upload is returned
/// as is.
#[tracing::instrument(skip(state, form), fields(operation = "resize_single"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    form: MultipartForm,
) -> Result<Response, HttpAppError> {
    let request = SingleImageRequest::try_from(form)?;
    let target = validate_single_resize(request.file.is_some(), request.params)?;
    let file = request.file.ok_or(ValidationError::MissingFile {
        field: fields::FILE,
    })?;

    let item = materialize(std::slice::from_ref(&file), &AllowedContentTypes::png_only())?
        .pop()
        .ok_or_else(|| AppError::Internal("materializer returned no item".to_string()))?;

    let item = state.transformer.resize_single(item, target).await?;

    tracing::info!(
        filename = %item.filename,
        content_type = %item.content_type,
        size = item.len(),
        "Image resized"
    );

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, item.content_type)],
        item.bytes,
    )
        .into_response())
}

/// Convert PNG uploads to JPEG.
#[tracing::instrument(skip(state, form), fields(operation = "convert"))]
pub async fn convert_images(
    State(state): State<Arc<AppState>>,
    form: MultipartForm,
) -> Result<Response, HttpAppError> {
    let request = FilesRequest::from(form);
    validate_files(request.files.len())?;

    run_batch(
        &state,
        request.files,
        AllowedContentTypes::png_only(),
        BatchOperation::Convert,
    )
    .await
}

/// Re-encode PNG and JPEG uploads in their own format.
#[tracing::instrument(skip(state, form), fields(operation = "compress"))]
pub async fn compress_images(
    State(state): State<Arc<AppState>>,
    form: MultipartForm,
) -> Result<Response, HttpAppError> {
    let request = FilesRequest::from(form);
    validate_files(request.files.len())?;

    run_batch(
        &state,
        request.files,
        AllowedContentTypes::png_or_jpeg(),
        BatchOperation::Compress,
    )
    .await
}

/// Resize PNG and JPEG uploads to their index-aligned dimensions.
#[tracing::instrument(skip(state, form), fields(operation = "resize"))]
pub async fn resize_images(
    State(state): State<Arc<AppState>>,
    form: MultipartForm,
) -> Result<Response, HttpAppError> {
    let request = ResizeFilesRequest::try_from(form)?;
    let targets = validate_batch_resize(request.files.len(), &request.params)?;

    run_batch(
        &state,
        request.files,
        AllowedContentTypes::png_or_jpeg(),
        BatchOperation::Resize(targets),
    )
    .await
}

/// Resize PNG uploads, then convert them to JPEG.
#[tracing::instrument(skip(state, form), fields(operation = "process"))]
pub async fn process_images(
    State(state): State<Arc<AppState>>,
    form: MultipartForm,
) -> Result<Response, HttpAppError> {
    let request = ResizeFilesRequest::try_from(form)?;
    let targets = validate_batch_resize(request.files.len(), &request.params)?;

    run_batch(
        &state,
        request.files,
        AllowedContentTypes::png_only(),
        BatchOperation::Process(targets),
    )
    .await
}
