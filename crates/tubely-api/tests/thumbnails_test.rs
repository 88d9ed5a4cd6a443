//! Thumbnail upload and serving integration tests.
//!
//! Run with: `cargo test -p tubely-api --test thumbnails_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, setup_test_app, split_app_url};
use tubely_api::ErrorResponse;
use tubely_core::models::VideoResponse;
use uuid::Uuid;

/// 1x1 transparent PNG
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn thumbnail_form(data: &[u8], mime_type: &str) -> MultipartForm {
    let part = Part::bytes(data.to_vec())
        .file_name("thumb.png")
        .mime_type(mime_type);
    MultipartForm::new().add_part("thumbnail", part)
}

#[tokio::test]
async fn test_upload_thumbnail_is_served_with_its_media_type() {
    let app = setup_test_app().await;
    let video = app.seed_video().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", app.bearer_for(video.user_id))
        .multipart(thumbnail_form(PNG_BYTES, "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: VideoResponse = response.json();
    let url = body.thumbnail_url.expect("thumbnail_url should be set");
    assert_eq!(
        url,
        format!("http://localhost:8091/api/thumbnails/{}", video.id)
    );

    let stored = app.stored_video(video.id).await;
    assert_eq!(stored.thumbnail_url.as_deref(), Some(url.as_str()));

    // Served without credentials.
    let (path, _) = split_app_url(&url);
    let served = app.client().get(&path).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(served.as_bytes().as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn test_thumbnail_by_non_owner_is_rejected() {
    let app = setup_test_app().await;
    let video = app.seed_video().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", app.bearer_for(Uuid::new_v4()))
        .multipart(thumbnail_form(PNG_BYTES, "image/png"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(app.stored_video(video.id).await, video);

    let served = app
        .client()
        .get(&api_path(&format!("/thumbnails/{}", video.id)))
        .await;
    assert_eq!(served.status_code(), 404);
}

#[tokio::test]
async fn test_thumbnail_must_be_an_image() {
    let app = setup_test_app().await;
    let video = app.seed_video().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", app.bearer_for(video.user_id))
        .multipart(thumbnail_form(b"not an image", "text/plain"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn test_thumbnail_too_large() {
    let app = setup_test_app().await;
    let video = app.seed_video().await;
    let data = vec![0u8; 64 * 1024 + 1];

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
        .add_header("Authorization", app.bearer_for(video.user_id))
        .multipart(thumbnail_form(&data, "image/png"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.stored_video(video.id).await.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_thumbnail_for_unknown_video() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", Uuid::new_v4())))
        .add_header("Authorization", app.bearer_for(Uuid::new_v4()))
        .multipart(thumbnail_form(PNG_BYTES, "image/png"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_get_missing_thumbnail() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path(&format!("/thumbnails/{}", Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app.client().get(&api_path("/thumbnails/nope")).await;
    assert_eq!(response.status_code(), 400);
}
