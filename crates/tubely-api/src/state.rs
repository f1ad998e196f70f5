//! Application state shared by all handlers.

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{ThumbnailStoreTrait, VideoRepositoryTrait};
use tubely_processing::{MediaTranscoder, MediaValidator, Stager};
use tubely_storage::{LocalUrlSigner, Storage};

/// Upload pipeline collaborators.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub transcoder: Arc<dyn MediaTranscoder>,
    pub stager: Stager,
    pub video_validator: MediaValidator,
    pub thumbnail_validator: MediaValidator,
    /// Present only with the local backend; verifies `/media` download links.
    pub local_signer: Option<LocalUrlSigner>,
}

/// Record stores.
#[derive(Clone)]
pub struct DbState {
    pub videos: Arc<dyn VideoRepositoryTrait>,
    pub thumbnails: Arc<dyn ThumbnailStoreTrait>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub media: MediaState,
}
