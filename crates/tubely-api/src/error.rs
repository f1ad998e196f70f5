//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors from the storage,
//! processing and record crates convert into `AppError` here so every failure
//! renders with the same status, body and log line.

use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{StagingError, TranscodeError, ValidationError};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Unable to parse form: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that answers with `ErrorResponse` on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

fn error_response(app_error: &AppError, include_details: bool) -> ErrorResponse {
    ErrorResponse {
        error: app_error.client_message(),
        details: include_details.then(|| app_error.detailed_message()),
        error_type: include_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();

        (status, Json(error_response(app_error, include_details))).into_response()
    }
}

// Domain errors -> HttpAppError

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg) => AppError::S3(msg),
            StorageError::DownloadFailed(msg) => AppError::S3(msg),
            StorageError::PresignFailed(msg) => AppError::S3(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::BackendError(msg) => AppError::S3(msg),
            StorageError::IoError(err) => AppError::S3(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::InvalidContentType { .. } => {
                AppError::UnsupportedMediaType("Invalid file type".to_string())
            }
            ValidationError::MissingContentType => {
                AppError::BadRequest("Missing Content-Type for file".to_string())
            }
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

impl From<StagingError> for HttpAppError {
    fn from(err: StagingError) -> Self {
        let app = match err {
            StagingError::Create(source) => AppError::InternalWithSource {
                message: "Couldn't create temp file".to_string(),
                source: source.into(),
            },
            StagingError::Write(source) => AppError::InternalWithSource {
                message: "Couldn't write temp file".to_string(),
                source: source.into(),
            },
            StagingError::Read(msg) => {
                AppError::BadRequest(format!("Couldn't read upload: {}", msg))
            }
            StagingError::TooLarge { max } => {
                AppError::PayloadTooLarge(format!("Upload exceeds max {} bytes", max))
            }
            StagingError::Empty => AppError::InvalidInput("File is empty".to_string()),
            StagingError::UnknownExtension(media_type) => {
                AppError::UnsupportedMediaType(format!("Unsupported media type {}", media_type))
            }
        };
        HttpAppError(app)
    }
}

impl From<TranscodeError> for HttpAppError {
    fn from(err: TranscodeError) -> Self {
        let app = match err {
            TranscodeError::NoVideoStream => {
                AppError::InvalidInput("Uploaded file has no video stream".to_string())
            }
            other => AppError::MediaConversionError(other.to_string()),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("File not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let storage_err = StorageError::UploadFailed("Upload failed".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_from_storage_error_presign_failed() {
        let storage_err = StorageError::PresignFailed("no credentials".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::S3(_)));
    }

    #[test]
    fn test_from_validation_error_content_type() {
        let validation_err = ValidationError::InvalidContentType {
            content_type: "video/webm".to_string(),
            allowed: vec!["video/mp4".to_string()],
        };
        let HttpAppError(app_err) = validation_err.into();
        assert_eq!(app_err.http_status_code(), 415);
        assert_eq!(app_err.client_message(), "Invalid file type");
    }

    #[test]
    fn test_from_validation_error_file_too_large() {
        let validation_err = ValidationError::FileTooLarge {
            size: 1000,
            max: 500,
        };
        let HttpAppError(app_err) = validation_err.into();
        match app_err {
            AppError::PayloadTooLarge(msg) => {
                assert!(msg.contains("1000"));
                assert!(msg.contains("500"));
            }
            _ => panic!("Expected PayloadTooLarge variant"),
        }
    }

    #[test]
    fn test_from_staging_error_statuses() {
        let create = StagingError::Create(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(HttpAppError::from(create).0.http_status_code(), 500);

        let read = StagingError::Read("connection reset".to_string());
        assert_eq!(HttpAppError::from(read).0.http_status_code(), 400);

        let too_large = StagingError::TooLarge { max: 10 };
        assert_eq!(HttpAppError::from(too_large).0.http_status_code(), 413);

        assert_eq!(
            HttpAppError::from(StagingError::Empty).0.http_status_code(),
            400
        );
    }

    #[test]
    fn test_from_transcode_error() {
        let HttpAppError(no_stream) = TranscodeError::NoVideoStream.into();
        assert_eq!(no_stream.error_code(), "INVALID_INPUT");

        let HttpAppError(failed) = TranscodeError::Failed {
            tool: "ffmpeg",
            status: Some(1),
            stderr: "moov atom not found".to_string(),
        }
        .into();
        assert_eq!(failed.http_status_code(), 500);
        assert_eq!(failed.error_code(), "MEDIA_CONVERSION_ERROR");
        assert!(failed.is_sensitive());
    }

    #[test]
    fn test_sensitive_error_hides_details() {
        let err = AppError::MediaConversionError("ffmpeg exited with status 1".to_string());
        let body = error_response(&err, false);
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.error, "Failed to process media data");
    }

    #[test]
    fn test_error_response_shape() {
        let err = AppError::NotFound("Couldn't find video".to_string());
        let json = serde_json::to_value(error_response(&err, true)).expect("serialize");
        assert_eq!(json["error"], "Couldn't find video");
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["recoverable"], false);
        assert_eq!(json["error_type"], "NotFound");
        assert!(json["details"].as_str().is_some());
    }
}
