//! Configuration module
//!
//! Configuration is read from the environment (a `.env` file is honoured) and validated
//! once at startup so that handlers never see an inconsistent combination.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const PRESIGN_TTL_SECS: u64 = 60;
const MAX_VIDEO_SIZE_MB: u64 = 1024;
const MAX_THUMBNAIL_SIZE_MB: u64 = 10;

/// How a freshly uploaded video is recorded against its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoUrlMode {
    /// Store a `bucket,key` reference and mint a presigned URL on every read.
    Presigned,
    /// Store a ready-to-use URL (CDN or public bucket URL).
    Direct,
}

impl FromStr for VideoUrlMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presigned" => Ok(VideoUrlMode::Presigned),
            "direct" => Ok(VideoUrlMode::Direct),
            _ => Err(anyhow::anyhow!("Invalid video URL mode: {}", s)),
        }
    }
}

/// Where uploaded thumbnails are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStoreKind {
    /// Process-local map served by the thumbnail route. Lost on restart.
    Memory,
    /// The configured object storage, under `thumbnails/`.
    Storage,
}

impl FromStr for ThumbnailStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(ThumbnailStoreKind::Memory),
            "storage" => Ok(ThumbnailStoreKind::Storage),
            _ => Err(anyhow::anyhow!("Invalid thumbnail store: {}", s)),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    /// Externally reachable origin of this server, e.g. `http://localhost:8091`.
    pub public_base_url: String,
    pub log_json: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    /// Postgres connection string. `None` keeps video records in memory.
    pub database_url: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub local_storage_path: PathBuf,
    pub local_storage_base_url: String,
    // URL reconciliation
    pub video_url_mode: VideoUrlMode,
    pub cdn_base_url: Option<String>,
    pub presign_ttl_secs: u64,
    // Ingestion
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub scratch_dir: PathBuf,
    pub thumbnail_store: ThumbnailStoreKind,
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(SERVER_PORT);

        let public_base_url = env_opt("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let storage_backend = env_opt("STORAGE_BACKEND")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(StorageBackend::Local);

        let video_url_mode = env_opt("VIDEO_URL_MODE")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(VideoUrlMode::Presigned);

        let thumbnail_store = env_opt("THUMBNAIL_STORE")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(ThumbnailStoreKind::Memory);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let config = Config {
            base: BaseConfig {
                server_port,
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
                cors_origins,
                log_json: env::var("LOG_FORMAT")
                    .map(|f| f.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
                public_base_url: public_base_url.clone(),
                environment,
            },
            database_url: env_opt("DATABASE_URL"),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| format!("{}/assets", public_base_url)),
            video_url_mode,
            cdn_base_url: env_opt("CDN_BASE_URL"),
            presign_ttl_secs: env::var("PRESIGN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(PRESIGN_TTL_SECS),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            scratch_dir: env_opt("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            thumbnail_store,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        // Direct video URLs are persisted and read back by scheme.
        let base_urls = [
            ("PUBLIC_BASE_URL", Some(self.base.public_base_url.as_str())),
            ("LOCAL_STORAGE_BASE_URL", Some(self.local_storage_base_url.as_str())),
            ("CDN_BASE_URL", self.cdn_base_url.as_deref()),
        ];
        for (name, url) in base_urls {
            if let Some(url) = url {
                if !has_http_scheme(url) {
                    return Err(anyhow::anyhow!(
                        "{} must start with http:// or https://, got {:?}",
                        name,
                        url
                    ));
                }
            }
        }

        if self.presign_ttl_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_TTL_SECS must be greater than zero"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                // Local files are only readable through signed /assets URLs.
                if self.video_url_mode == VideoUrlMode::Direct && self.cdn_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "VIDEO_URL_MODE=direct requires CDN_BASE_URL when using local storage"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn public_base_url(&self) -> &str {
        self.base.public_base_url.trim_end_matches('/')
    }

    pub fn presign_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.presign_ttl_secs)
    }
}
