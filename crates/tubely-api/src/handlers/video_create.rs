use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tubely_core::{AppError, CreateVideoRequest, Video, VideoResponse};

const MAX_TITLE_LEN: usize = 200;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = VideoResponse),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        ))
        .into());
    }

    let video = Video::new(user.user_id, title.to_string(), request.description);
    let video = state.db.videos.create_video(video).await?;

    tracing::info!(video_id = %video.id, "Video draft created");
    Ok((StatusCode::CREATED, Json(video.into())))
}
