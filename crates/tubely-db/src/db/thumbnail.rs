use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::Thumbnail;
use uuid::Uuid;

use crate::db::StoreError;

/// Where thumbnail payloads are kept once accepted.
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Store (or replace) the thumbnail of a video and return the URL it is served from.
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, StoreError>;

    /// Thumbnail held for `video_id`, if this store serves thumbnails itself.
    async fn get(&self, video_id: Uuid) -> Result<Option<Thumbnail>, StoreError>;
}

/// Thumbnails held in process memory and served by the thumbnail route.
///
/// No eviction; everything is lost on restart.
#[derive(Clone)]
pub struct InMemoryThumbnailStore {
    base_url: String,
    thumbnails: Arc<RwLock<HashMap<Uuid, Thumbnail>>>,
}

impl InMemoryThumbnailStore {
    /// `base_url` is the server origin, e.g. `http://localhost:8091`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            thumbnails: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn url_for(&self, video_id: Uuid) -> String {
        format!("{}/api/thumbnails/{}", self.base_url, video_id)
    }
}

#[async_trait]
impl ThumbnailStore for InMemoryThumbnailStore {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, StoreError> {
        self.thumbnails.write().await.insert(video_id, thumbnail);
        Ok(self.url_for(video_id))
    }

    async fn get(&self, video_id: Uuid) -> Result<Option<Thumbnail>, StoreError> {
        Ok(self.thumbnails.read().await.get(&video_id).cloned())
    }
}
