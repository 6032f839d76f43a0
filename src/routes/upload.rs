use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header, StatusCode},
    Form, Json,
};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::media::{is_allowed_mime, MAX_UPLOAD_BYTES};
use crate::services::media::MediaUpload;
use crate::services::validation::EntryForm;

/// Multipart field carrying the entry's image or video.
pub const MEDIA_FIELD: &str = "media";

/// Request body slack on top of the file limit, for the text fields and multipart framing.
pub const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Text fields plus an optional media file, read from a multipart, JSON or
/// url-encoded body.
#[derive(Debug, Default)]
pub struct EntrySubmission {
    pub form: EntryForm,
    pub media: Option<MediaUpload>,
}

impl<S> FromRequest<S> for EntrySubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Upload(e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(vec![e.body_text()]))?;
            Ok(Self {
                form: form_from_json(fields),
                media: None,
            })
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(vec![e.body_text()]))?;
            let mut form = EntryForm::default();
            for (name, value) in fields {
                form.set(&name, value);
            }
            Ok(Self { form, media: None })
        } else {
            Ok(Self::default())
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<EntrySubmission, AppError> {
    let mut submission = EntrySubmission::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name != MEDIA_FIELD {
            let value = field.text().await.map_err(multipart_error)?;
            submission.form.set(&name, value);
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            // Browsers send an empty part when no file was picked.
            field.bytes().await.map_err(multipart_error)?;
            continue;
        }
        if submission.media.is_some() {
            return Err(AppError::Upload(
                "Only one media file may be uploaded".to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !is_allowed_mime(&content_type) {
            tracing::info!(filename = %filename, content_type = %content_type, "rejected upload type");
            return Err(AppError::Upload(
                "Only images, videos and GIFs are allowed!".to_string(),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }

        submission.media = Some(MediaUpload {
            filename,
            content_type,
            data,
        });
    }

    Ok(submission)
}

fn form_from_json(fields: Map<String, Value>) -> EntryForm {
    let mut form = EntryForm::default();
    for (name, value) in fields {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s,
            other => other.to_string(),
        };
        form.set(&name, value);
    }
    form
}

fn too_large() -> AppError {
    AppError::Upload(format!(
        "File too large. Maximum size is {}MB",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Upload(e.body_text())
    }
}
