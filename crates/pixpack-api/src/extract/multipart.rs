use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use pixpack_processing::UploadedFile;

use crate::error::HttpAppError;

/// Multipart body, grouped by field name.
///
/// Parts with a filename are files; everything else is a text value. Repeated
/// fields keep their order.
#[derive(Debug, Default)]
pub struct MultipartForm {
    files: HashMap<String, Vec<UploadedFile>>,
    values: HashMap<String, Vec<String>>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(|s| s.to_string()).unwrap_or_default();

            match field.file_name().map(|s| s.to_string()) {
                Some(filename) => {
                    let data = field.bytes().await?;
                    tracing::debug!(
                        field = %name,
                        filename = %filename,
                        size = data.len(),
                        "Received file part"
                    );
                    form.files
                        .entry(name)
                        .or_default()
                        .push(UploadedFile::new(filename, data));
                }
                None => {
                    let text = field.text().await?;
                    form.values.entry(name).or_default().push(text);
                }
            }
        }

        Ok(form)
    }

    /// Remove and return every file sent under `field`.
    pub fn take_files(&mut self, field: &str) -> Vec<UploadedFile> {
        self.files.remove(field).unwrap_or_default()
    }

    pub fn values(&self, field: &str) -> &[String] {
        self.values.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first_value(&self, field: &str) -> Option<&str> {
        self.values(field).first().map(String::as_str)
    }
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        MultipartForm::read(multipart).await
    }
}

#[cfg(test)]
impl MultipartForm {
    pub fn with_file(mut self, field: &str, file: UploadedFile) -> Self {
        self.files.entry(field.to_string()).or_default().push(file);
        self
    }

    pub fn with_value(mut self, field: &str, value: &str) -> Self {
        self.values
            .entry(field.to_string())
            .or_default()
            .push(value.to_string());
        self
    }
}
