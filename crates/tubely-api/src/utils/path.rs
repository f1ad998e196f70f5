//! Path parameter extraction.

use crate::error::HttpAppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tubely_core::AppError;
use uuid::Uuid;

/// `{videoID}` path segment parsed as a UUID; anything else is a 400.
///
/// Declared ahead of [`crate::auth::AuthUser`] in handler signatures so a
/// malformed ID is reported before credentials are checked.
#[derive(Debug, Clone, Copy)]
pub struct VideoId(pub Uuid);

impl<S> FromRequestParts<S> for VideoId
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| HttpAppError(AppError::BadRequest(e.body_text())))?;

        let id = Uuid::parse_str(&raw)
            .map_err(|_| HttpAppError(AppError::BadRequest("Invalid ID".to_string())))?;
        Ok(VideoId(id))
    }
}
