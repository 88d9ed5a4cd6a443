//! A pipeline wired to in-memory stores and fakes

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tubely_core::models::Video;
use tubely_core::VideoUrlMode;
use tubely_db::{InMemoryThumbnailStore, InMemoryVideoRepository};
use uuid::Uuid;

use super::{CopyRewriter, FakeInspector, FallibleVideoStore, MockStorage};
use crate::error::ProcessingError;
use crate::ingest::{IngestionConfig, IngestionPipeline};
use crate::video::{FastStartRewriter, MediaInspector, VideoDimensions};

pub const TEST_BASE_URL: &str = "http://localhost:8091";

pub struct TestPipeline {
    pub pipeline: IngestionPipeline,
    pub videos: InMemoryVideoRepository,
    /// The record store the pipeline writes through; wraps `videos`.
    pub records: Arc<FallibleVideoStore>,
    pub storage: Arc<MockStorage>,
    pub thumbnails: InMemoryThumbnailStore,
    pub scratch: TempDir,
}

impl TestPipeline {
    /// Defaults: 1920x1080 stream, presigned URLs with a 60s TTL.
    pub async fn new() -> Self {
        Self::builder().build().await
    }

    pub async fn with_dimensions(dimensions: VideoDimensions) -> Self {
        Self::builder().dimensions(dimensions).build().await
    }

    pub fn builder() -> TestPipelineBuilder {
        TestPipelineBuilder::default()
    }

    /// Insert a video owned by a fresh user.
    pub async fn seed_video(&self) -> Video {
        let video = Video::new(Uuid::new_v4(), "Test clip");
        self.videos.insert(video.clone()).await;
        video
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch.path().to_path_buf()
    }
}

/// Files left in the pipeline's scratch directory.
pub fn scratch_entries(t: &TestPipeline) -> Vec<PathBuf> {
    std::fs::read_dir(t.scratch.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

pub struct TestPipelineBuilder {
    dimensions: VideoDimensions,
    probe_error: Option<ProcessingError>,
    failing_rewriter: bool,
    max_video_size_bytes: u64,
    max_thumbnail_size_bytes: u64,
    video_url_mode: VideoUrlMode,
    cdn_base_url: Option<String>,
    presign_ttl: Duration,
}

impl Default for TestPipelineBuilder {
    fn default() -> Self {
        Self {
            dimensions: VideoDimensions {
                width: 1920,
                height: 1080,
            },
            probe_error: None,
            failing_rewriter: false,
            max_video_size_bytes: 1 << 20,
            max_thumbnail_size_bytes: 10 << 20,
            video_url_mode: VideoUrlMode::Presigned,
            cdn_base_url: None,
            presign_ttl: Duration::from_secs(60),
        }
    }
}

impl TestPipelineBuilder {
    pub fn dimensions(mut self, dimensions: VideoDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn probe_error(mut self, error: ProcessingError) -> Self {
        self.probe_error = Some(error);
        self
    }

    pub fn failing_rewriter(mut self) -> Self {
        self.failing_rewriter = true;
        self
    }

    pub fn max_video_size_bytes(mut self, limit: u64) -> Self {
        self.max_video_size_bytes = limit;
        self
    }

    pub fn max_thumbnail_size_bytes(mut self, limit: u64) -> Self {
        self.max_thumbnail_size_bytes = limit;
        self
    }

    pub fn video_url_mode(mut self, mode: VideoUrlMode) -> Self {
        self.video_url_mode = mode;
        self
    }

    pub fn cdn_base_url(mut self, url: &str) -> Self {
        self.cdn_base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn presign_ttl(mut self, ttl: Duration) -> Self {
        self.presign_ttl = ttl;
        self
    }

    pub async fn build(self) -> TestPipeline {
        let scratch = tempfile::tempdir().unwrap();
        let videos = InMemoryVideoRepository::new();
        let records = Arc::new(FallibleVideoStore::new(videos.clone()));
        let storage = Arc::new(MockStorage::new());
        let thumbnails = InMemoryThumbnailStore::new(TEST_BASE_URL);

        let inspector: Arc<dyn MediaInspector> = match self.probe_error {
            Some(error) => Arc::new(FakeInspector::failing(error)),
            None => Arc::new(FakeInspector::new(
                self.dimensions.width,
                self.dimensions.height,
            )),
        };
        let rewriter: Arc<dyn FastStartRewriter> = if self.failing_rewriter {
            Arc::new(CopyRewriter::failing())
        } else {
            Arc::new(CopyRewriter::new())
        };

        let config = IngestionConfig {
            scratch_dir: scratch.path().to_path_buf(),
            max_video_size_bytes: self.max_video_size_bytes,
            max_thumbnail_size_bytes: self.max_thumbnail_size_bytes,
            video_url_mode: self.video_url_mode,
            cdn_base_url: self.cdn_base_url,
            presign_ttl: self.presign_ttl,
        };

        let pipeline = IngestionPipeline::new(
            records.clone(),
            storage.clone(),
            Arc::new(thumbnails.clone()),
            inspector,
            rewriter,
            config,
        );

        TestPipeline {
            pipeline,
            videos,
            records,
            storage,
            thumbnails,
            scratch,
        }
    }
}
