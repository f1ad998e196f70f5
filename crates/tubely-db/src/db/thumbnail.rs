use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use tubely_core::AppError;
use uuid::Uuid;

/// Stored thumbnail image
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

#[async_trait]
pub trait ThumbnailStoreTrait: Send + Sync {
    /// Store (or replace) the thumbnail for a video
    async fn put_thumbnail(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<(), AppError>;

    async fn get_thumbnail(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError>;
}

#[derive(Default)]
pub struct InMemoryThumbnailStore {
    thumbnails: RwLock<HashMap<Uuid, Thumbnail>>,
}

impl InMemoryThumbnailStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThumbnailStoreTrait for InMemoryThumbnailStore {
    async fn put_thumbnail(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<(), AppError> {
        self.thumbnails.write().await.insert(video_id, thumbnail);
        Ok(())
    }

    async fn get_thumbnail(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError> {
        Ok(self.thumbnails.read().await.get(&video_id).cloned())
    }
}

// (media type, file extension)
const THUMBNAIL_FORMATS: &[(&str, &str)] = &[("image/jpeg", "jpeg"), ("image/png", "png")];

/// Thumbnails as `<root>/<video_id>.<ext>` files.
pub struct FileThumbnailStore {
    root: PathBuf,
}

impl FileThumbnailStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create assets directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, video_id: Uuid, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", video_id, extension))
    }
}

#[async_trait]
impl ThumbnailStoreTrait for FileThumbnailStore {
    async fn put_thumbnail(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<(), AppError> {
        let extension = THUMBNAIL_FORMATS
            .iter()
            .find(|(media_type, _)| *media_type == thumbnail.media_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::UnsupportedMediaType(format!(
                    "Unsupported thumbnail type: {}",
                    thumbnail.media_type
                ))
            })?;

        let path = self.path_for(video_id, extension);
        let partial = path.with_extension(format!("{}.partial", extension));
        fs::write(&partial, &thumbnail.data).await?;
        fs::rename(&partial, &path).await?;

        // Drop a previous thumbnail stored under the other format
        for (_, other) in THUMBNAIL_FORMATS.iter().filter(|(_, ext)| *ext != extension) {
            let stale = self.path_for(video_id, other);
            if fs::try_exists(&stale).await.unwrap_or(false) {
                fs::remove_file(&stale).await?;
            }
        }

        tracing::debug!(
            video_id = %video_id,
            path = %path.display(),
            size_bytes = thumbnail.data.len(),
            "Thumbnail stored"
        );
        Ok(())
    }

    async fn get_thumbnail(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError> {
        for (media_type, extension) in THUMBNAIL_FORMATS {
            match fs::read(self.path_for(video_id, extension)).await {
                Ok(data) => {
                    return Ok(Some(Thumbnail {
                        data: Bytes::from(data),
                        media_type: media_type.to_string(),
                    }))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }
}
