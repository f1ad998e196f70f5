//! Thumbnail upload and serving integration tests.
//!
//! Run with: `cargo test -p tubely-api --test thumbnail_upload_test`

mod helpers;

use helpers::auth::bearer;
use helpers::fixtures::{create_minimal_png, file_form};
use helpers::storage::TEST_BUCKET;
use helpers::{setup_test_app, MAX_THUMBNAIL_BYTES, PUBLIC_BASE_URL};
use uuid::Uuid;

#[tokio::test]
async fn test_upload_png_thumbnail_and_serve_it() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;
    let png = create_minimal_png();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("thumbnail", png.clone(), "thumb.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let expected_url = format!("{}/api/thumbnails/{}", PUBLIC_BASE_URL, video.id);
    let body: serde_json::Value = response.json();
    assert_eq!(body["thumbnail_url"], expected_url.as_str());
    assert_eq!(
        app.stored_video(video.id).await.thumbnail_url.as_deref(),
        Some(expected_url.as_str())
    );

    let served = app
        .client()
        .get(&format!("/api/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.header("content-type"), "image/png");
    assert_eq!(served.as_bytes().as_ref(), png.as_slice());
}

#[tokio::test]
async fn test_upload_jpeg_thumbnail_with_put() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .put(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form(
            "thumbnail",
            vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
            "thumb.jpg",
            "image/jpeg",
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    let served = app
        .client()
        .get(&format!("/api/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.header("content-type"), "image/jpeg");
}

#[tokio::test]
async fn test_gif_thumbnail_rejected() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("thumbnail", b"GIF89a".to_vec(), "thumb.gif", "image/gif"))
        .await;

    assert_eq!(response.status_code(), 415);
    assert!(app.stored_video(video.id).await.thumbnail_url.is_none());

    let served = app
        .client()
        .get(&format!("/api/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.status_code(), 404);
}

#[tokio::test]
async fn test_thumbnail_non_owner_is_forbidden() {
    let (app, _storage) = setup_test_app();
    let video = app.create_video(Uuid::new_v4()).await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(file_form("thumbnail", create_minimal_png(), "thumb.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(app.stored_video(video.id).await, video);
}

#[tokio::test]
async fn test_oversized_thumbnail_rejected() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form(
            "thumbnail",
            vec![0u8; MAX_THUMBNAIL_BYTES + 1],
            "thumb.png",
            "image/png",
        ))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.stored_video(video.id).await.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_missing_thumbnail_field() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("image", create_minimal_png(), "thumb.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_thumbnail_response_keeps_signed_video_url() {
    let (app, _storage) = setup_test_app();
    let owner = Uuid::new_v4();
    let mut video = app.create_video(owner).await;
    video.video_url = Some(format!("{},landscape/abc.mp4", TEST_BUCKET));
    app.state.db.videos.update_video(&video).await.unwrap();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", bearer(owner))
        .multipart(file_form("thumbnail", create_minimal_png(), "thumb.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let video_url = body["video_url"].as_str().unwrap();
    assert!(video_url.starts_with("https://tubely-test.s3.test.local/landscape/abc.mp4?"));

    // The record keeps the reference, not the signed URL
    assert_eq!(
        app.stored_video(video.id).await.video_url.as_deref(),
        Some("tubely-test,landscape/abc.mp4")
    );
}

#[tokio::test]
async fn test_get_thumbnail_invalid_id() {
    let (app, _storage) = setup_test_app();

    let response = app.client().get("/api/thumbnails/nope").await;

    assert_eq!(response.status_code(), 400);
}
