//! Multipart helpers shared by the upload handlers.
//!
//! The file part is located by name, its declared content type is checked
//! before a single body byte is read, and the body is then either staged to
//! scratch storage or buffered under a size ceiling.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use tubely_core::AppError;
use tubely_processing::{MediaValidator, StagedUpload, Stager, StagingError, ValidationError};

use crate::error::HttpAppError;

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpAppError(AppError::PayloadTooLarge(
            "Request body exceeds the upload limit".to_string(),
        ))
    } else {
        HttpAppError(AppError::BadRequest(format!(
            "Unable to parse form: {}",
            err.body_text()
        )))
    }
}

fn missing_field(name: &str) -> HttpAppError {
    HttpAppError(AppError::BadRequest(format!(
        "Couldn't get {} from request",
        name
    )))
}

/// Check the declared content type of `field`; returns the normalized media type.
fn validate_field(field: &Field<'_>, validator: &MediaValidator) -> Result<String, HttpAppError> {
    let media_type = validator.validate_content_type(field.content_type())?;
    tracing::debug!(
        field = field.name().unwrap_or_default(),
        media_type = %media_type,
        file_name = field.file_name().unwrap_or_default(),
        "Upload field accepted"
    );
    Ok(media_type)
}

/// Stream the part named `name` into a scratch file.
///
/// Parts with other names are skipped. Fails with 400 when the part is
/// missing, 415 when its content type is not allowed and 413 when it exceeds
/// the validator's ceiling.
pub async fn stage_upload_field(
    mut multipart: Multipart,
    name: &str,
    validator: &MediaValidator,
    stager: &Stager,
) -> Result<StagedUpload, HttpAppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }

        let media_type = validate_field(&field, validator)?;
        let max = validator.max_file_size();
        let stream = field.map_err(move |e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                StagingError::TooLarge { max }
            } else {
                StagingError::Read(e.body_text())
            }
        });

        let staged = stager.stage(&media_type, max, stream).await?;
        return Ok(staged);
    }

    Err(missing_field(name))
}

/// Buffer the part named `name` in memory, bounded by the validator's ceiling.
/// Returns the bytes and the normalized media type.
pub async fn read_upload_field(
    mut multipart: Multipart,
    name: &str,
    validator: &MediaValidator,
) -> Result<(Bytes, String), HttpAppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }

        let media_type = validate_field(&field, validator)?;
        let max = validator.max_file_size();

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            let size = data.len() + chunk.len();
            if size > max {
                return Err(ValidationError::FileTooLarge { size, max }.into());
            }
            data.extend_from_slice(&chunk);
        }
        validator.validate_file_size(data.len())?;

        return Ok((data.freeze(), media_type));
    }

    Err(missing_field(name))
}
