use crate::auth::AuthUser;
use crate::constants::VIDEO_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::services::VideoPublishService;
use crate::state::AppState;
use crate::utils::path::VideoId;
use crate::utils::upload::stage_upload_field;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tubely_core::VideoResponse;

#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "videos",
    params(("videoID" = uuid::Uuid, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a `video` part (video/mp4)"),
    responses(
        (status = 200, description = "Video published", body = VideoResponse),
        (status = 400, description = "Invalid ID, form or video", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not an MP4 video", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, video_id, &user).await?;

    tracing::info!("Uploading video");

    let staged = stage_upload_field(
        multipart?,
        VIDEO_FIELD,
        &state.media.video_validator,
        &state.media.stager,
    )
    .await?;

    let service = VideoPublishService::new(&state);
    let reference = service.publish(staged).await?;
    let response = service.attach(video.id, &reference).await?;

    tracing::info!(reference = %reference, "Video upload complete");
    Ok(Json(response))
}
