use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::path::VideoId;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

#[utoipa::path(
    get,
    path = "/api/thumbnails/{videoID}",
    tag = "videos",
    params(("videoID" = uuid::Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Thumbnail image", content_type = "image/*"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "No thumbnail for this video", body = ErrorResponse)
    )
)]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
) -> Result<Response, HttpAppError> {
    let thumbnail = state
        .db
        .thumbnails
        .get_thumbnail(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, thumbnail.media_type),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        thumbnail.data,
    )
        .into_response())
}
