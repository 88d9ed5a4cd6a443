use tubely_core::models::{Video, VideoResponse, VideoUrl};
use tubely_storage::StorageError;
use uuid::Uuid;

use super::IngestionPipeline;
use crate::error::IngestError;

impl IngestionPipeline {
    /// Turn a stored video URL into one a client can play.
    ///
    /// Object references are presigned on every call and never persisted.
    pub async fn resolve_video_url(&self, video_url: &VideoUrl) -> Result<String, IngestError> {
        match video_url {
            VideoUrl::Direct(url) => Ok(url.clone()),
            VideoUrl::ObjectRef { bucket, key } => {
                if bucket != self.storage.bucket() {
                    return Err(StorageError::PresignFailed(format!(
                        "object {} is in bucket {}, storage is configured for {}",
                        key,
                        bucket,
                        self.storage.bucket()
                    ))
                    .into());
                }
                Ok(self
                    .storage
                    .presign_read(key, self.config.presign_ttl)
                    .await?)
            }
        }
    }

    /// Client view of a record with its video URL resolved.
    pub async fn to_response(&self, video: Video) -> Result<VideoResponse, IngestError> {
        let resolved = match &video.video_url {
            Some(url) => Some(self.resolve_video_url(url).await?),
            None => None,
        };
        Ok(VideoResponse::new(video, resolved))
    }

    /// Response for a record that has already been written.
    ///
    /// The write stands even if presigning fails, so the URL is left out instead of
    /// failing the request.
    pub(crate) async fn committed_response(&self, video: Video) -> VideoResponse {
        let resolved = match &video.video_url {
            Some(url) => match self.resolve_video_url(url).await {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        video_id = %video.id,
                        "Record updated but its video URL could not be resolved"
                    );
                    None
                }
            },
            None => None,
        };
        VideoResponse::new(video, resolved)
    }

    /// Fetch a video on behalf of its owner.
    pub async fn video_for_owner(
        &self,
        video_id: Uuid,
        user_id: Uuid,
    ) -> Result<VideoResponse, IngestError> {
        let video = self.authorize(video_id, user_id).await?;
        self.to_response(video).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestPipeline;

    #[tokio::test]
    async fn test_direct_url_passes_through() {
        let t = TestPipeline::new().await;
        let url = VideoUrl::Direct("https://cdn.example.com/other/x.mp4".to_string());

        assert_eq!(
            t.pipeline.resolve_video_url(&url).await.unwrap(),
            "https://cdn.example.com/other/x.mp4"
        );
    }

    #[tokio::test]
    async fn test_object_ref_is_presigned_on_each_read() {
        let t = TestPipeline::new().await;
        let mut video = t.seed_video().await;
        video.video_url = Some(VideoUrl::object_ref("test-bucket", "portrait/abc.mp4"));
        t.videos.insert(video.clone()).await;

        let response = t
            .pipeline
            .video_for_owner(video.id, video.user_id)
            .await
            .unwrap();

        assert_eq!(
            response.video_url.as_deref(),
            Some("https://test-bucket.storage.test/portrait/abc.mp4?expires_in=60")
        );
        assert_eq!(t.storage.presign_count(), 1);

        t.pipeline
            .video_for_owner(video.id, video.user_id)
            .await
            .unwrap();
        assert_eq!(t.storage.presign_count(), 2);
    }

    #[tokio::test]
    async fn test_foreign_bucket_is_an_error() {
        let t = TestPipeline::new().await;
        let url = VideoUrl::object_ref("someone-elses-bucket", "landscape/abc.mp4");

        let result = t.pipeline.resolve_video_url(&url).await;
        assert!(matches!(
            result,
            Err(IngestError::Storage(StorageError::PresignFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_video_without_url() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let response = t
            .pipeline
            .video_for_owner(video.id, video.user_id)
            .await
            .unwrap();
        assert!(response.video_url.is_none());
        assert_eq!(response.title, video.title);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_read() {
        let t = TestPipeline::new().await;
        let video = t.seed_video().await;

        let result = t.pipeline.video_for_owner(video.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(IngestError::Unauthorized(_))));
    }
}
