use pixpack_core::constants::fields;
use pixpack_core::models::{BatchResizeParams, ResizeParams};
use pixpack_core::validation::parse_dimension;
use pixpack_core::ValidationError;
use pixpack_processing::UploadedFile;

use super::MultipartForm;

/// `POST /`: one `file` plus optional `resizeHeight` / `resizeWidth`.
#[derive(Debug)]
pub struct SingleImageRequest {
    pub file: Option<UploadedFile>,
    pub params: ResizeParams,
}

/// Batch routes without per-item parameters.
#[derive(Debug)]
pub struct FilesRequest {
    pub files: Vec<UploadedFile>,
}

/// Batch routes with index-aligned `height[]` / `width[]`.
#[derive(Debug)]
pub struct ResizeFilesRequest {
    pub files: Vec<UploadedFile>,
    pub params: BatchResizeParams,
}

/// Missing or blank means zero.
fn optional_dimension(form: &MultipartForm, field: &'static str) -> Result<i64, ValidationError> {
    match form.first_value(field).map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => parse_dimension(field, raw),
    }
}

fn dimensions(form: &MultipartForm, field: &'static str) -> Result<Vec<i64>, ValidationError> {
    form.values(field)
        .iter()
        .map(|raw| parse_dimension(field, raw))
        .collect()
}

impl TryFrom<MultipartForm> for SingleImageRequest {
    type Error = ValidationError;

    fn try_from(mut form: MultipartForm) -> Result<Self, Self::Error> {
        let params = ResizeParams {
            height: optional_dimension(&form, fields::RESIZE_HEIGHT)?,
            width: optional_dimension(&form, fields::RESIZE_WIDTH)?,
        };
        // Extra parts under the same name are ignored
        let file = form.take_files(fields::FILE).into_iter().next();

        Ok(Self { file, params })
    }
}

impl From<MultipartForm> for FilesRequest {
    fn from(mut form: MultipartForm) -> Self {
        Self {
            files: form.take_files(fields::FILES),
        }
    }
}

impl TryFrom<MultipartForm> for ResizeFilesRequest {
    type Error = ValidationError;

    fn try_from(mut form: MultipartForm) -> Result<Self, Self::Error> {
        let params = BatchResizeParams {
            heights: dimensions(&form, fields::HEIGHTS)?,
            widths: dimensions(&form, fields::WIDTHS)?,
        };

        Ok(Self {
            files: form.take_files(fields::FILES),
            params,
        })
    }
}
