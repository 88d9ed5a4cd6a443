use crate::auth::AuthContext;
use crate::error::HttpAppError;
use crate::handlers::parse_video_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;

#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state
        .pipeline
        .video_for_owner(video_id, auth.user_id)
        .await?;

    Ok(Json(video))
}
