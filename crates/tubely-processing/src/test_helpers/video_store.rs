//! Record store whose writes can be switched to fail

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tubely_core::models::Video;
use tubely_db::{InMemoryVideoRepository, StoreError, VideoRecordStore};
use uuid::Uuid;

/// Reads and writes go to `inner` until [`FallibleVideoStore::fail_updates`] is set.
pub struct FallibleVideoStore {
    inner: InMemoryVideoRepository,
    fail_updates: AtomicBool,
}

impl FallibleVideoStore {
    pub fn new(inner: InMemoryVideoRepository) -> Self {
        Self {
            inner,
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Make every subsequent update fail.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRecordStore for FallibleVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Video, StoreError> {
        self.inner.get_video(id).await
    }

    async fn update_video(&self, video: &Video) -> Result<(), StoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated update failure".to_string()));
        }
        self.inner.update_video(video).await
    }
}
