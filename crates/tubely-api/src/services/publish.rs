//! Video publishing service
//!
//! Pipeline after staging: fast-start rewrite → aspect probe → object store
//! upload → record update. The stored `video_url` is the canonical
//! `bucket,key` reference; read paths turn it into a signed URL with
//! [`sign_video`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tubely_core::{AppError, Video, VideoResponse};
use tubely_processing::StagedUpload;
use tubely_storage::{object_key, ObjectReference, Storage};
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

pub struct VideoPublishService {
    state: Arc<AppState>,
}

impl VideoPublishService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Transcode, classify and upload a staged video. Scratch files are gone
    /// once this returns, whatever the outcome.
    #[tracing::instrument(skip(self, staged), fields(file_name = staged.file_name(), size_bytes = staged.size()))]
    pub async fn publish(&self, staged: StagedUpload) -> Result<ObjectReference, HttpAppError> {
        let media = &self.state.media;

        let start = Instant::now();
        let artifact = media.transcoder.process(staged.path()).await?;
        tracing::debug!(
            aspect = %artifact.aspect(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Video processed for fast start"
        );

        let file_name = artifact.file_name().ok_or_else(|| {
            AppError::Internal(format!(
                "Processed file has no usable name: {}",
                artifact.path().display()
            ))
        })?;
        let key = object_key(artifact.aspect().as_prefix(), file_name)?;

        let start = Instant::now();
        let reference = media
            .storage
            .put_file(&key, staged.media_type(), artifact.path())
            .await?;
        tracing::info!(
            key = %key,
            reference = %reference,
            duration_ms = start.elapsed().as_millis() as u64,
            "Video uploaded to object storage"
        );

        Ok(reference)
    }

    /// Persist `reference` as the video's URL and return the signed view.
    pub async fn attach(
        &self,
        video_id: Uuid,
        reference: &ObjectReference,
    ) -> Result<VideoResponse, HttpAppError> {
        let updated = self
            .state
            .db
            .videos
            .set_video_url(video_id, reference.to_string())
            .await?;

        sign_video(
            self.state.media.storage.as_ref(),
            updated,
            self.state.config.signed_url_ttl(),
        )
        .await
    }
}

/// Client view of `video` with a stored object reference replaced by a
/// presigned GET URL. Values that are not a `bucket,key` pair pass through.
pub async fn sign_video(
    storage: &dyn Storage,
    video: Video,
    ttl: Duration,
) -> Result<VideoResponse, HttpAppError> {
    let Some(reference) = video.video_url.as_deref().and_then(ObjectReference::parse) else {
        return Ok(video.into());
    };

    let url = storage.presign_get(&reference, ttl).await?;
    let mut response = VideoResponse::from(video);
    response.video_url = Some(url);
    Ok(response)
}
