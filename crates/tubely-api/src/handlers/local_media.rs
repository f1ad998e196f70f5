//! Signed downloads for the local storage backend.
//!
//! `LocalStorage::presign_get` hands out `{base_url}/{bucket}/{key}?expires=..&signature=..`
//! links; this route checks the signature and expiry before serving the bytes.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tubely_core::AppError;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    expires: Option<u64>,
    signature: Option<String>,
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "mp4" => "video/mp4",
        Some(ext) if ext == "jpeg" || ext == "jpg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        _ => "application/octet-stream",
    }
}

pub async fn serve_local_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, HttpAppError> {
    let signer = state
        .media
        .local_signer
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Err(AppError::Forbidden("Missing signature".to_string()).into());
    };

    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    if !signer.verify(&bucket, &key, expires, signature, now) {
        tracing::debug!(bucket = %bucket, key = %key, "Rejected local media link");
        return Err(AppError::Forbidden("Invalid or expired signature".to_string()).into());
    }

    if bucket != state.media.storage.bucket() {
        return Err(AppError::NotFound("Not found".to_string()).into());
    }

    let data = state.media.storage.get_object(&key).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&key)),
            (header::CACHE_CONTROL, "private, max-age=600"),
        ],
        data,
    )
        .into_response())
}
