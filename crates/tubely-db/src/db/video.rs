use async_trait::async_trait;
use tubely_core::models::Video;
use uuid::Uuid;

use crate::db::StoreError;

/// Read and write access to video rows.
///
/// Updates replace the whole row. Concurrent writers to the same video are
/// last-writer-wins.
#[async_trait]
pub trait VideoRecordStore: Send + Sync {
    /// Fetch a video by id. Unknown ids are [`StoreError::NotFound`].
    async fn get_video(&self, id: Uuid) -> Result<Video, StoreError>;

    /// Persist every mutable field of `video`. Unknown ids are [`StoreError::NotFound`].
    async fn update_video(&self, video: &Video) -> Result<(), StoreError>;
}
