use crate::error::HttpAppError;
use crate::handlers::parse_video_id;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tubely_core::AppError;

/// Serve a thumbnail from the in-memory store. Public, like the URLs it answers for.
#[tracing::instrument(skip(state), fields(operation = "get_thumbnail"))]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    let thumbnail = state
        .pipeline
        .thumbnails()
        .get(video_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, thumbnail.media_type.as_str())
        .header(header::CONTENT_LENGTH, thumbnail.data.len())
        .body(Body::from(thumbnail.data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}
