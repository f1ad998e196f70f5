//! Record stores, media tools and application state

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{
    FileThumbnailStore, InMemoryThumbnailStore, InMemoryVideoRepository, ThumbnailStoreTrait,
};
use tubely_processing::{FFmpegTranscoder, MediaValidator, Stager};
use tubely_storage::{LocalUrlSigner, Storage};

use crate::state::{AppState, DbState, MediaState};

pub async fn initialize_services(
    config: &Config,
    storage: Arc<dyn Storage>,
    local_signer: Option<LocalUrlSigner>,
) -> Result<Arc<AppState>> {
    let thumbnails: Arc<dyn ThumbnailStoreTrait> = match config.assets_root() {
        Some(root) => {
            tracing::info!(assets_root = %root.display(), "Thumbnails stored on disk");
            Arc::new(FileThumbnailStore::new(root).await?)
        }
        None => {
            tracing::info!("Thumbnails stored in memory");
            Arc::new(InMemoryThumbnailStore::new())
        }
    };

    tokio::fs::create_dir_all(config.scratch_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                config.scratch_dir().display()
            )
        })?;

    let transcoder = FFmpegTranscoder::new(
        config.ffmpeg_path().to_string(),
        config.ffprobe_path().to_string(),
        config.media_tool_timeout(),
    )
    .context("Invalid media tool configuration")?;

    tracing::info!(
        ffmpeg_path = config.ffmpeg_path(),
        ffprobe_path = config.ffprobe_path(),
        timeout_secs = config.media_tool_timeout().as_secs(),
        "Media tools configured"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        db: DbState {
            videos: Arc::new(InMemoryVideoRepository::new()),
            thumbnails,
        },
        media: MediaState {
            storage,
            transcoder: Arc::new(transcoder),
            stager: Stager::new(config.scratch_dir()),
            video_validator: MediaValidator::video(config.max_video_size_bytes()),
            thumbnail_validator: MediaValidator::thumbnail(config.max_thumbnail_size_bytes()),
            local_signer,
        },
    }))
}
