use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::services::sign_video;
use crate::state::AppState;
use crate::utils::path::VideoId;
use axum::{extract::State, Json};
use std::sync::Arc;
use tubely_core::VideoResponse;

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = uuid::Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video with a signed playback URL", body = VideoResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
    user: AuthUser,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, video_id, &user).await?;

    let response = sign_video(
        state.media.storage.as_ref(),
        video,
        state.config.signed_url_ttl(),
    )
    .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = Vec<VideoResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.db.videos.get_videos_for_user(user.user_id).await?;

    let ttl = state.config.signed_url_ttl();
    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(sign_video(state.media.storage.as_ref(), video, ttl).await?);
    }

    Ok(Json(responses))
}
