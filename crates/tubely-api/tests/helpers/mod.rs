//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs on local storage in a temp dir with in-memory record and thumbnail
//! stores; stream inspection and remuxing are faked so no ffmpeg binaries are needed.

#![allow(dead_code)]

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::auth::JwtAuthenticator;
use tubely_api::constants::API_PREFIX;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::models::Video;
use tubely_core::{BaseConfig, Config, StorageBackend, ThumbnailStoreKind, VideoUrlMode};
use tubely_db::{InMemoryThumbnailStore, InMemoryVideoRepository, VideoRecordStore};
use tubely_processing::test_helpers::{CopyRewriter, FakeInspector};
use tubely_processing::{IngestionConfig, IngestionPipeline};
use tubely_storage::{LocalStorage, Storage, UrlSigner};
use uuid::Uuid;

pub const TEST_BASE_URL: &str = "http://localhost:8091";
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Test application: server, stores, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub storage_dir: PathBuf,
    pub scratch_dir: PathBuf,
    authenticator: JwtAuthenticator,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a video owned by a fresh user.
    pub async fn seed_video(&self) -> Video {
        let video = Video::new(Uuid::new_v4(), "Test clip");
        self.videos.insert(video.clone()).await;
        video
    }

    /// Current state of a seeded row.
    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("video should exist")
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.authenticator
            .issue_token(user_id, Duration::from_secs(3600))
            .expect("Failed to issue token")
    }

    pub fn bearer_for(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.token_for(user_id))
    }

    /// Files left behind in the scratch directory.
    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.scratch_dir)
            .expect("Failed to read scratch dir")
            .map(|entry| entry.expect("Failed to read scratch entry").path())
            .collect()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(1920, 1080).await
}

/// Test app whose fake inspector reports `width`x`height`.
pub async fn setup_test_app_with(width: u32, height: u32) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_dir = temp_dir.path().join("assets");
    let scratch_dir = temp_dir.path().join("scratch");
    std::fs::create_dir_all(&scratch_dir).expect("Failed to create scratch dir");

    let config = create_test_config(storage_dir.clone(), scratch_dir.clone());

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            storage_dir.clone(),
            config.local_storage_base_url.clone(),
            UrlSigner::new(config.jwt_secret()),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let videos = InMemoryVideoRepository::new();
    let pipeline = IngestionPipeline::new(
        Arc::new(videos.clone()),
        storage.clone(),
        Arc::new(InMemoryThumbnailStore::new(config.public_base_url())),
        Arc::new(FakeInspector::new(width, height)),
        Arc::new(CopyRewriter::new()),
        IngestionConfig::from_config(&config),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        pipeline,
        storage,
        url_signer: UrlSigner::new(config.jwt_secret()),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        storage_dir,
        scratch_dir,
        authenticator: JwtAuthenticator::new(TEST_JWT_SECRET),
        _temp_dir: temp_dir,
    }
}

fn create_test_config(local_storage_path: PathBuf, scratch_dir: PathBuf) -> Config {
    Config {
        base: BaseConfig {
            server_port: 8091,
            environment: "test".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            cors_origins: vec!["*".to_string()],
            public_base_url: TEST_BASE_URL.to_string(),
            log_json: false,
        },
        database_url: None,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path,
        local_storage_base_url: format!("{}/assets", TEST_BASE_URL),
        video_url_mode: VideoUrlMode::Presigned,
        cdn_base_url: None,
        presign_ttl_secs: 60,
        max_video_size_bytes: 1024 * 1024,
        max_thumbnail_size_bytes: 64 * 1024,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        scratch_dir,
        thumbnail_store: ThumbnailStoreKind::Memory,
    }
}

/// Split an absolute URL minted by the app into a server path and its query pairs.
pub fn split_app_url(url: &str) -> (String, Vec<(String, String)>) {
    let relative = url
        .strip_prefix(TEST_BASE_URL)
        .unwrap_or_else(|| panic!("URL {} is not served by the test app", url));

    let (path, query) = relative.split_once('?').unwrap_or((relative, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    (path.to_string(), params)
}
