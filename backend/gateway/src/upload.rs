//! Multipart form reading shared by the OCR and attachment uploads.

use axum::extract::Multipart;
use forestclaim_understanding::ImagePayload;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub(crate) struct Upload {
    pub file: Option<ImagePayload>,
    pub lang: Option<String>,
}

impl Upload {
    pub fn require_file(self) -> Result<(ImagePayload, Option<String>), ApiError> {
        match self.file {
            Some(file) => Ok((file, self.lang)),
            None => Err(ApiError::BadRequest("multipart field 'file' is required".into())),
        }
    }
}

/// Collect the `file` and optional `lang` parts; other parts are ignored.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let bad = |e: axum::extract::multipart::MultipartError| ApiError::BadRequest(e.body_text());
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad)?;
                upload.file = Some(match content_type {
                    Some(ct) => ImagePayload::new(bytes, file_name, ct),
                    None => ImagePayload::from_file_name(bytes, file_name),
                });
            }
            Some("lang") => {
                let lang = field.text().await.map_err(bad)?;
                let lang = lang.trim();
                if !lang.is_empty() {
                    upload.lang = Some(lang.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}
