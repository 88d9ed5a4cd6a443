use crate::auth::AuthContext;
use crate::error::HttpAppError;
use crate::handlers::parse_video_id;
use crate::state::AppState;
use crate::utils::multipart::{field_content_type, field_reader, missing_field};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::models::VideoResponse;

/// `POST /api/videos/{videoID}/upload`
///
/// Ownership is checked before the multipart body is touched; the `video` part is then
/// streamed straight into the ingestion pipeline.
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state.pipeline.authorize(video_id, auth.user_id).await?;

    tracing::info!(video_id = %video_id, "Uploading video");

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field_content_type(&field);
        let response = state
            .pipeline
            .ingest_video(video, &content_type, field_reader(field))
            .await?;
        return Ok(Json(response));
    }

    Err(missing_field(VIDEO_FORM_FIELD))
}
