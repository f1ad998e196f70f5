//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubely-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::state::{AppState, DbState, MediaState};
use tubely_core::{Config, ServiceConfig, StorageBackend, Video};
use tubely_db::{InMemoryThumbnailStore, InMemoryVideoRepository};
use tubely_processing::{MediaValidator, Stager};
use tubely_storage::{LocalStorage, LocalUrlSigner, Storage};
use uuid::Uuid;

use fixtures::FakeTranscoder;
use storage::MockStorage;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const MAX_VIDEO_BYTES: usize = 1024 * 1024;
pub const MAX_THUMBNAIL_BYTES: usize = 64 * 1024;

/// Test application: server, state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub transcoder: Arc<FakeTranscoder>,
    pub scratch: TempDir,
    pub _storage_dir: Option<TempDir>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a draft video owned by `user_id` straight into the record store.
    pub async fn create_video(&self, user_id: Uuid) -> Video {
        let video = Video::new(user_id, "Boots on the ground".to_string(), String::new());
        self.state
            .db
            .videos
            .create_video(video)
            .await
            .expect("create video")
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.state
            .db
            .videos
            .get_video(id)
            .await
            .expect("get video")
            .expect("video exists")
    }

    /// Number of entries left in the scratch directory.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .expect("read scratch dir")
            .count()
    }
}

pub fn test_config(scratch_dir: &Path, backend: StorageBackend, local_path: Option<&Path>) -> Config {
    Config(Box::new(ServiceConfig {
        environment: "test".to_string(),
        server_port: 8091,
        cors_origins: vec!["*".to_string()],
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        storage_backend: backend,
        s3_bucket: (backend == StorageBackend::S3).then(|| storage::TEST_BUCKET.to_string()),
        s3_region: Some("us-east-2".to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: local_path.map(|p| p.to_string_lossy().to_string()),
        local_storage_base_url: None,
        scratch_dir: scratch_dir.to_path_buf(),
        assets_root: None,
        max_video_size_bytes: MAX_VIDEO_BYTES,
        max_thumbnail_size_bytes: MAX_THUMBNAIL_BYTES,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        media_tool_timeout_secs: 30,
        signed_url_ttl_secs: 600,
    }))
}

fn build_app(
    config: Config,
    storage: Arc<dyn Storage>,
    local_signer: Option<LocalUrlSigner>,
    transcoder: Arc<FakeTranscoder>,
    scratch: TempDir,
    storage_dir: Option<TempDir>,
) -> TestApp {
    let state = Arc::new(AppState {
        db: DbState {
            videos: Arc::new(InMemoryVideoRepository::new()),
            thumbnails: Arc::new(InMemoryThumbnailStore::new()),
        },
        media: MediaState {
            storage,
            transcoder: transcoder.clone(),
            stager: Stager::new(scratch.path()),
            video_validator: MediaValidator::video(config.max_video_size_bytes()),
            thumbnail_validator: MediaValidator::thumbnail(config.max_thumbnail_size_bytes()),
            local_signer,
        },
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone()).expect("setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        transcoder,
        scratch,
        _storage_dir: storage_dir,
    }
}

/// Test app backed by the in-memory storage double.
pub fn setup_test_app() -> (TestApp, Arc<MockStorage>) {
    let scratch = tempfile::tempdir().expect("Failed to create scratch directory");
    let config = test_config(scratch.path(), StorageBackend::S3, None);
    let storage = Arc::new(MockStorage::new());
    let app = build_app(
        config,
        storage.clone(),
        None,
        Arc::new(FakeTranscoder::default()),
        scratch,
        None,
    );
    (app, storage)
}

/// Test app backed by real local filesystem storage and `/media` links.
pub async fn setup_local_test_app() -> TestApp {
    let scratch = tempfile::tempdir().expect("Failed to create scratch directory");
    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
    let config = test_config(scratch.path(), StorageBackend::Local, Some(storage_dir.path()));

    let signer = LocalUrlSigner::new(config.jwt_secret().as_bytes()).expect("signer");
    let storage = LocalStorage::new(
        storage_dir.path(),
        config.local_storage_base_url(),
        config.local_storage_bucket().to_string(),
        signer.clone(),
    )
    .await
    .expect("local storage");

    build_app(
        config,
        Arc::new(storage),
        Some(signer),
        Arc::new(FakeTranscoder::default()),
        scratch,
        Some(storage_dir),
    )
}
