//! Domain route groups (videos, uploads, thumbnails, local media).

use crate::constants::{API_BASE, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tubely_core::Config;

pub fn video_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos", API_BASE),
            get(handlers::video_get::list_videos).post(handlers::video_create::create_video),
        )
        .route(
            &format!("{}/videos/{{videoID}}", API_BASE),
            get(handlers::video_get::get_video),
        )
}

/// Upload routes carry their own body ceilings; the stock 2 MB extractor
/// limit is lifted so the per-route layer is the only bound.
pub fn upload_routes(config: &Config) -> Router<Arc<AppState>> {
    let video = Router::new()
        .route(
            &format!("{}/video_upload/{{videoID}}", API_BASE),
            post(handlers::video_upload::upload_video).put(handlers::video_upload::upload_video),
        )
        .layer(RequestBodyLimitLayer::new(
            config
                .max_video_size_bytes()
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(DefaultBodyLimit::disable());

    let thumbnail = Router::new()
        .route(
            &format!("{}/thumbnail_upload/{{videoID}}", API_BASE),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .put(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(RequestBodyLimitLayer::new(
            config
                .max_thumbnail_size_bytes()
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(DefaultBodyLimit::disable());

    video.merge(thumbnail)
}

pub fn thumbnail_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/thumbnails/{{videoID}}", API_BASE),
        get(handlers::thumbnail_get::get_thumbnail),
    )
}

pub fn media_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/media/{bucket}/{*key}",
        get(handlers::local_media::serve_local_object),
    )
}
