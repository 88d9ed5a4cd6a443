//! Wiring of stores, storage and the ingestion pipeline

use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::{Config, ThumbnailStoreKind};
use tubely_db::{
    InMemoryThumbnailStore, InMemoryVideoRepository, PgVideoRepository, ThumbnailStore,
    VideoRecordStore,
};
use tubely_processing::{
    FfmpegFastStart, FfprobeInspector, IngestionConfig, IngestionPipeline, StorageThumbnailStore,
};
use tubely_storage::{create_storage, UrlSigner};

pub async fn initialize_services(config: &Config, pool: Option<PgPool>) -> Result<Arc<AppState>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.bucket(),
        "Storage initialized"
    );

    let videos: Arc<dyn VideoRecordStore> = match pool {
        Some(pool) => Arc::new(PgVideoRepository::new(pool)),
        None => Arc::new(InMemoryVideoRepository::new()),
    };

    let thumbnails: Arc<dyn ThumbnailStore> = match config.thumbnail_store {
        ThumbnailStoreKind::Memory => {
            Arc::new(InMemoryThumbnailStore::new(config.public_base_url()))
        }
        ThumbnailStoreKind::Storage => Arc::new(StorageThumbnailStore::new(
            storage.clone(),
            config.cdn_base_url.clone(),
        )),
    };

    let pipeline = IngestionPipeline::new(
        videos,
        storage.clone(),
        thumbnails,
        Arc::new(FfprobeInspector::new(&config.ffprobe_path)),
        Arc::new(FfmpegFastStart::new(&config.ffmpeg_path)),
        IngestionConfig::from_config(config),
    );

    tracing::info!(
        video_url_mode = ?config.video_url_mode,
        thumbnail_store = ?config.thumbnail_store,
        scratch_dir = %config.scratch_dir.display(),
        "Ingestion pipeline ready"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pipeline,
        storage,
        url_signer: UrlSigner::new(config.jwt_secret()),
    }))
}
