use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::io::AsyncRead;
use tubely_core::models::{Thumbnail, Video, VideoResponse};
use tubely_db::{StoreError, ThumbnailStore};
use tubely_storage::{thumbnail_key, Storage};
use uuid::Uuid;

use super::{media_type_essence, read_capped, IngestionPipeline};
use crate::error::IngestError;

impl IngestionPipeline {
    /// Store a thumbnail for an already authorized `video` and point the record at it.
    ///
    /// The declared media type is kept verbatim; only its top-level type is checked.
    #[tracing::instrument(skip(self, video, body), fields(video_id = %video.id))]
    pub async fn ingest_thumbnail<R>(
        &self,
        mut video: Video,
        media_type: &str,
        body: R,
    ) -> Result<VideoResponse, IngestError>
    where
        R: AsyncRead + Unpin + Send,
    {
        if !media_type_essence(media_type).starts_with("image/") {
            return Err(IngestError::UnsupportedMediaType(media_type.to_string()));
        }

        let data = read_capped(body, self.config.max_thumbnail_size_bytes).await?;
        let size_bytes = data.len();

        let url = self
            .thumbnails
            .put(video.id, Thumbnail::new(Bytes::from(data), media_type))
            .await?;

        video.thumbnail_url = Some(url);
        video.updated_at = Utc::now();
        self.videos.update_video(&video).await?;

        tracing::info!(
            media_type = %media_type,
            size_bytes = size_bytes,
            "Thumbnail stored"
        );

        Ok(self.committed_response(video).await)
    }
}

/// Thumbnails written to object storage as `thumbnails/{video_id}.{ext}`.
///
/// The returned URL is unsigned, so the objects must be publicly readable (or fronted by
/// a CDN). Thumbnails are never served back through [`ThumbnailStore::get`].
pub struct StorageThumbnailStore {
    storage: Arc<dyn Storage>,
    cdn_base_url: Option<String>,
}

impl StorageThumbnailStore {
    pub fn new(storage: Arc<dyn Storage>, cdn_base_url: Option<String>) -> Self {
        Self {
            storage,
            cdn_base_url: cdn_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

#[async_trait]
impl ThumbnailStore for StorageThumbnailStore {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, StoreError> {
        let key = thumbnail_key(video_id, thumbnail.extension());
        let stored = self
            .storage
            .put_bytes(&key, thumbnail.data, &thumbnail.media_type)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(match &self.cdn_base_url {
            Some(cdn) => format!("{}/{}", cdn, stored.key),
            None => stored.url,
        })
    }

    async fn get(&self, _video_id: Uuid) -> Result<Option<Thumbnail>, StoreError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockStorage, TestPipeline};
    use tubely_core::models::VideoUrl;
    use tubely_db::VideoRecordStore;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[tokio::test]
    async fn test_png_stored_and_served_as_png() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let response = t
            .pipeline
            .ingest_thumbnail(video.clone(), "image/png", PNG)
            .await
            .unwrap();

        let expected_url = format!("http://localhost:8091/api/thumbnails/{}", video.id);
        assert_eq!(response.thumbnail_url.as_deref(), Some(expected_url.as_str()));

        let stored = t.thumbnails.get(video.id).await.unwrap().unwrap();
        assert_eq!(stored.media_type, "image/png");
        assert_eq!(&stored.data[..], PNG);

        let record = t.videos.get_video(video.id).await.unwrap();
        assert_eq!(record.thumbnail_url, Some(expected_url));
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let result = t
            .pipeline
            .ingest_thumbnail(video.clone(), "application/pdf", PNG)
            .await;

        assert!(matches!(result, Err(IngestError::UnsupportedMediaType(_))));
        assert!(t.thumbnails.get(video.id).await.unwrap().is_none());
        assert_eq!(t.videos.get_video(video.id).await.unwrap(), video);
    }

    #[tokio::test]
    async fn test_oversized_thumbnail_rejected() {
        let t = TestPipeline::builder()
            .max_thumbnail_size_bytes(4)
            .build()
            .await;
        let video = t.seed_video().await;

        let result = t.pipeline.ingest_thumbnail(video.clone(), "image/png", PNG).await;

        assert!(matches!(
            result,
            Err(IngestError::PayloadTooLarge { limit_bytes: 4 })
        ));
        assert_eq!(t.videos.get_video(video.id).await.unwrap(), video);
    }

    #[tokio::test]
    async fn test_record_update_failure_leaves_row() {
        let t = TestPipeline::new().await;
        t.records.fail_updates(true);
        let video = t.seed_video().await;

        let result = t.pipeline.ingest_thumbnail(video.clone(), "image/png", PNG).await;

        assert!(matches!(result, Err(IngestError::Store(_))));
        assert_eq!(t.videos.get_video(video.id).await.unwrap(), video);
        // The store was written before the row; its payload is not rolled back.
        assert!(t.thumbnails.get(video.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unresolvable_video_url_does_not_fail_thumbnail() {
        let t = TestPipeline::new().await;
        let mut video = t.seed_video().await;
        video.video_url = Some(VideoUrl::object_ref("test-bucket", "landscape/a.mp4"));
        t.videos.insert(video.clone()).await;
        t.storage.fail_presigns(true);

        let response = t
            .pipeline
            .ingest_thumbnail(video.clone(), "image/png", PNG)
            .await
            .unwrap();

        assert!(response.video_url.is_none());
        assert!(response.thumbnail_url.is_some());
        let stored = t.videos.get_video(video.id).await.unwrap();
        assert_eq!(stored.video_url, video.video_url);
    }

    #[tokio::test]
    async fn test_storage_store_writes_keyed_object() {
        let storage = Arc::new(MockStorage::new());
        let store = StorageThumbnailStore::new(storage.clone(), None);
        let id = Uuid::new_v4();

        let url = store
            .put(id, Thumbnail::new(Bytes::from_static(PNG), "image/png"))
            .await
            .unwrap();

        let key = format!("thumbnails/{}.png", id);
        assert_eq!(url, format!("https://test-bucket.storage.test/{}", key));

        let object = storage.object(&key).unwrap();
        assert_eq!(object.content_type, "image/png");
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_store_prefers_cdn() {
        let storage = Arc::new(MockStorage::new());
        let store =
            StorageThumbnailStore::new(storage, Some("https://cdn.example.com/".to_string()));
        let id = Uuid::new_v4();

        let url = store
            .put(id, Thumbnail::new(Bytes::from_static(PNG), "image/jpeg"))
            .await
            .unwrap();

        assert_eq!(url, format!("https://cdn.example.com/thumbnails/{}.jpeg", id));
    }
}
