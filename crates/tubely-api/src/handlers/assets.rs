//! Signed reads for the local storage backend.
//!
//! Videos need a valid `expires`/`signature` pair minted by the backend's presign call.
//! Objects under `thumbnails/` are served without one since their URLs are stored as-is.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use tubely_core::AppError;

const PUBLIC_PREFIX: &str = "thumbnails/";

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: Option<u64>,
    pub signature: Option<String>,
}

/// Content type served for a key, derived from its extension.
fn content_type_for(key: &str) -> String {
    let extension = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("mp4") => "video/mp4".to_string(),
        Some(ext) if key.starts_with(PUBLIC_PREFIX) && !ext.contains('/') => {
            format!("image/{}", ext)
        }
        _ => "application/octet-stream".to_string(),
    }
}

#[tracing::instrument(skip(state, query), fields(operation = "get_asset"))]
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, HttpAppError> {
    if !key.starts_with(PUBLIC_PREFIX) {
        let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
            return Err(AppError::Unauthorized("Missing URL signature".to_string()).into());
        };
        state
            .url_signer
            .verify(&key, expires, signature)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
    }

    let stream = state.storage.download_stream(&key).await.map_err(|e| {
        tracing::debug!(error = %e, key = %key, "Failed to open stored object");
        HttpAppError::from(e)
    })?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&key))
        .header(header::CACHE_CONTROL, "private, max-age=60")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for("landscape/abc.mp4"), "video/mp4");
        assert_eq!(content_type_for("thumbnails/123.png"), "image/png");
        assert_eq!(content_type_for("thumbnails/123.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("other/abc"), "application/octet-stream");
        assert_eq!(content_type_for("other/abc.png"), "application/octet-stream");
    }
}
