use crate::auth::AuthUser;
use crate::constants::{API_BASE, THUMBNAIL_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::services::sign_video;
use crate::state::AppState;
use crate::utils::path::VideoId;
use crate::utils::upload::read_upload_field;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tubely_core::VideoResponse;
use tubely_db::Thumbnail;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    tag = "videos",
    params(("videoID" = uuid::Uuid, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a `thumbnail` part (image/jpeg or image/png)"),
    responses(
        (status = 200, description = "Thumbnail stored", body = VideoResponse),
        (status = 400, description = "Invalid ID or form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not a JPEG or PNG image", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    load_owned_video(&state, video_id, &user).await?;

    let (data, media_type) = read_upload_field(
        multipart?,
        THUMBNAIL_FIELD,
        &state.media.thumbnail_validator,
    )
    .await?;
    let size = data.len();

    state
        .db
        .thumbnails
        .put_thumbnail(video_id, Thumbnail { data, media_type })
        .await?;

    let thumbnail_url = format!(
        "{}{}/thumbnails/{}",
        state.config.public_base_url(),
        API_BASE,
        video_id
    );
    let updated = state
        .db
        .videos
        .set_thumbnail_url(video_id, thumbnail_url)
        .await?;

    tracing::info!(size_bytes = size, "Thumbnail stored");

    let response = sign_video(
        state.media.storage.as_ref(),
        updated,
        state.config.signed_url_ttl(),
    )
    .await?;
    Ok(Json(response))
}
