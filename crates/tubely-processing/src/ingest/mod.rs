//! The ingestion pipeline
//!
//! Turns an authenticated upload into a stored asset referenced from its video row:
//!
//! ```text
//! authorize -> buffer to scratch -> fast-start remux -> inspect -> classify -> name
//!           -> upload -> reconcile record -> respond
//! ```
//!
//! Stages run strictly in order. The first failure ends the run, every local file created so
//! far is removed by its guard, and the video row is only written after the upload succeeded.

mod resolve;
mod thumbnail;
mod video;

pub use thumbnail::StorageThumbnailStore;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_core::models::Video;
use tubely_core::{Config, VideoUrlMode};
use tubely_db::{ThumbnailStore, VideoRecordStore};
use tubely_storage::Storage;
use uuid::Uuid;

use crate::error::IngestError;
use crate::video::{FastStartRewriter, MediaInspector};

/// Pipeline settings derived from [`Config`].
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub scratch_dir: PathBuf,
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    pub video_url_mode: VideoUrlMode,
    /// Prefix for direct video URLs. Falls back to the backend's own object URL.
    pub cdn_base_url: Option<String>,
    pub presign_ttl: Duration,
}

impl IngestionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scratch_dir: config.scratch_dir.clone(),
            max_video_size_bytes: config.max_video_size_bytes,
            max_thumbnail_size_bytes: config.max_thumbnail_size_bytes,
            video_url_mode: config.video_url_mode,
            cdn_base_url: config
                .cdn_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            presign_ttl: config.presign_ttl(),
        }
    }
}

#[derive(Clone)]
pub struct IngestionPipeline {
    videos: Arc<dyn VideoRecordStore>,
    storage: Arc<dyn Storage>,
    thumbnails: Arc<dyn ThumbnailStore>,
    inspector: Arc<dyn MediaInspector>,
    rewriter: Arc<dyn FastStartRewriter>,
    config: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(
        videos: Arc<dyn VideoRecordStore>,
        storage: Arc<dyn Storage>,
        thumbnails: Arc<dyn ThumbnailStore>,
        inspector: Arc<dyn MediaInspector>,
        rewriter: Arc<dyn FastStartRewriter>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            videos,
            storage,
            thumbnails,
            inspector,
            rewriter,
            config,
        }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn thumbnails(&self) -> &Arc<dyn ThumbnailStore> {
        &self.thumbnails
    }

    /// Load a video and check that `user_id` owns it.
    ///
    /// Runs before any upload body is read, so rejected requests never touch disk.
    #[tracing::instrument(skip(self))]
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, IngestError> {
        let video = self.videos.get_video(video_id).await?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %user_id,
                owner_id = %video.user_id,
                "Upload attempted by non-owner"
            );
            return Err(IngestError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(video)
    }
}

/// Media type without parameters, e.g. `image/png; q=1` -> `image/png`.
fn media_type_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

/// Read at most `limit` bytes of `body` into memory.
async fn read_capped<R>(body: R, limit: u64) -> Result<Vec<u8>, IngestError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut data = Vec::new();
    body.take(limit + 1).read_to_end(&mut data).await?;

    if data.len() as u64 > limit {
        return Err(IngestError::PayloadTooLarge { limit_bytes: limit });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestPipeline;

    #[test]
    fn test_media_type_essence() {
        assert_eq!(media_type_essence("image/png"), "image/png");
        assert_eq!(media_type_essence("image/jpeg; charset=binary"), "image/jpeg");
        assert_eq!(media_type_essence(""), "");
    }

    #[tokio::test]
    async fn test_read_capped() {
        let data = read_capped(&b"12345"[..], 5).await.unwrap();
        assert_eq!(data, b"12345");

        let result = read_capped(&b"123456"[..], 5).await;
        assert!(matches!(
            result,
            Err(IngestError::PayloadTooLarge { limit_bytes: 5 })
        ));
    }

    #[tokio::test]
    async fn test_authorize_owner() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let loaded = t.pipeline.authorize(video.id, video.user_id).await.unwrap();
        assert_eq!(loaded, video);
    }

    #[tokio::test]
    async fn test_authorize_rejects_non_owner() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let result = t.pipeline.authorize(video.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(IngestError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authorize_unknown_video() {
        let t = TestPipeline::new().await;
        let id = Uuid::new_v4();

        let result = t.pipeline.authorize(id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(IngestError::VideoNotFound(v)) if v == id));
    }
}
