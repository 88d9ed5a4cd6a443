use chrono::Utc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::models::{Video, VideoResponse, VideoUrl};
use tubely_core::VideoUrlMode;
use tubely_storage::{video_key, StoredObject};

use super::IngestionPipeline;
use crate::error::IngestError;

impl IngestionPipeline {
    /// Run a video upload for an already authorized `video`.
    ///
    /// `content_type` is the declared type of the multipart part and is checked before a
    /// single byte of `body` is read.
    #[tracing::instrument(skip(self, video, body), fields(video_id = %video.id))]
    pub async fn ingest_video<R>(
        &self,
        mut video: Video,
        content_type: &str,
        body: R,
    ) -> Result<VideoResponse, IngestError>
    where
        R: AsyncRead + Unpin + Send,
    {
        if content_type != VIDEO_CONTENT_TYPE {
            return Err(IngestError::UnsupportedMediaType(content_type.to_string()));
        }

        let start = std::time::Instant::now();

        let upload = self.buffer_to_scratch(body).await?;

        let processed = self.rewriter.rewrite(upload.path()).await?;
        // The original upload is no longer needed once the remux exists.
        if let Err(e) = upload.close() {
            tracing::warn!(error = %e, "Failed to remove upload scratch file");
        }

        let dimensions = self.inspector.probe(processed.path()).await?;
        let aspect_ratio = dimensions.aspect_ratio();
        let key = video_key(aspect_ratio)?;

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            aspect_ratio = %aspect_ratio,
            key = %key,
            "Classified upload"
        );

        let stored = self
            .storage
            .put_file(&key, processed.path(), VIDEO_CONTENT_TYPE)
            .await?;
        drop(processed);

        video.video_url = Some(self.video_url_for(&stored));
        video.updated_at = Utc::now();
        if let Err(e) = self.videos.update_video(&video).await {
            // The object stays in storage without a row pointing at it.
            tracing::error!(
                error = %e,
                bucket = %stored.bucket,
                key = %stored.key,
                "Video record update failed after upload"
            );
            return Err(e.into());
        }

        tracing::info!(
            key = %stored.key,
            size_bytes = stored.size_bytes,
            aspect_ratio = %aspect_ratio,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(self.committed_response(video).await)
    }

    /// Stream `body` into a fresh scratch file, enforcing the size cap.
    async fn buffer_to_scratch<R>(&self, body: R) -> Result<tempfile::NamedTempFile, IngestError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let limit = self.config.max_video_size_bytes;

        let upload = tempfile::Builder::new()
            .prefix("tubely-upload")
            .suffix(".mp4")
            .tempfile_in(&self.config.scratch_dir)?;

        let mut file = tokio::fs::File::from_std(upload.as_file().try_clone()?);
        let written = tokio::io::copy(&mut body.take(limit + 1), &mut file).await?;
        if written > limit {
            return Err(IngestError::PayloadTooLarge { limit_bytes: limit });
        }
        file.flush().await?;

        tracing::debug!(
            path = %upload.path().display(),
            size_bytes = written,
            "Buffered upload to scratch"
        );

        Ok(upload)
    }

    fn video_url_for(&self, stored: &StoredObject) -> VideoUrl {
        match self.config.video_url_mode {
            VideoUrlMode::Presigned => VideoUrl::object_ref(&stored.bucket, &stored.key),
            VideoUrlMode::Direct => match &self.config.cdn_base_url {
                Some(cdn) => VideoUrl::Direct(format!("{}/{}", cdn, stored.key)),
                None => VideoUrl::Direct(stored.url.clone()),
            },
        }
    }
}
