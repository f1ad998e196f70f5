use crate::auth::jwt::{get_bearer_token, validate_jwt};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

/// Caller identity taken from a valid bearer token.
///
/// Extracted directly from request parts so it composes with `Multipart`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = get_bearer_token(&parts.headers)?;
        let user_id = validate_jwt(token, state.config.jwt_secret())?;
        Ok(AuthUser { user_id })
    }
}
