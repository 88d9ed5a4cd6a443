use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::Video;
use uuid::Uuid;

use crate::db::{StoreError, VideoRecordStore};

/// Process-local video rows. Used when no `DATABASE_URL` is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row.
    pub async fn insert(&self, video: Video) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRecordStore for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Video, StoreError> {
        self.videos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), StoreError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(video.id)),
        }
    }
}
