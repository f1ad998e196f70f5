use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tubely_core::{AppError, Video};
use uuid::Uuid;

#[async_trait]
pub trait VideoRepositoryTrait: Send + Sync {
    async fn create_video(&self, video: Video) -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All videos owned by `user_id`, newest first
    async fn get_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Replace the stored record and bump `updated_at`. Last writer wins.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;

    /// Set only `video_url` on the current record, leaving other fields as
    /// they are at write time.
    async fn set_video_url(&self, id: Uuid, video_url: String) -> Result<Video, AppError>;

    /// Set only `thumbnail_url` on the current record.
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: String)
        -> Result<Video, AppError>;
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: Uuid, apply: impl FnOnce(&mut Video)) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        apply(stored);
        stored.updated_at = Utc::now();

        tracing::debug!(video_id = %id, "Video record updated");
        Ok(stored.clone())
    }
}

#[async_trait]
impl VideoRepositoryTrait for InMemoryVideoRepository {
    async fn create_video(&self, video: Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::Database(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());

        tracing::debug!(video_id = %video.id, user_id = %video.user_id, "Video record created");
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn get_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;

        let mut updated = video.clone();
        updated.created_at = stored.created_at;
        updated.updated_at = Utc::now();
        *stored = updated.clone();

        tracing::debug!(video_id = %video.id, "Video record updated");
        Ok(updated)
    }

    async fn set_video_url(&self, id: Uuid, video_url: String) -> Result<Video, AppError> {
        self.modify(id, |video| video.video_url = Some(video_url))
            .await
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        thumbnail_url: String,
    ) -> Result<Video, AppError> {
        self.modify(id, |video| video.thumbnail_url = Some(thumbnail_url))
            .await
    }
}
