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
use tubely_core::constants::THUMBNAIL_FORM_FIELD;
use tubely_core::models::VideoResponse;

/// `POST /api/thumbnail_upload/{videoID}`
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state.pipeline.authorize(video_id, auth.user_id).await?;

    tracing::info!(video_id = %video_id, "Uploading thumbnail");

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(THUMBNAIL_FORM_FIELD) {
            continue;
        }

        let media_type = field_content_type(&field);
        let response = state
            .pipeline
            .ingest_thumbnail(video, &media_type, field_reader(field))
            .await?;
        return Ok(Json(response));
    }

    Err(missing_field(THUMBNAIL_FORM_FIELD))
}
