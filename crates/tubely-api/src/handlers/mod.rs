pub mod health;
pub mod local_media;
pub mod thumbnail_get;
pub mod thumbnail_upload;
pub mod video_create;
pub mod video_get;
pub mod video_upload;

use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Load a video the caller is allowed to modify: 404 when unknown, 403 when
/// it belongs to someone else.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user: &AuthUser,
) -> Result<Video, HttpAppError> {
    let video = state
        .db
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user.user_id) {
        tracing::debug!(
            video_id = %video_id,
            user_id = %user.user_id,
            owner_id = %video.user_id,
            "Rejected media change by non-owner"
        );
        return Err(AppError::Forbidden("Not authorized to update this video".to_string()).into());
    }

    Ok(video)
}
