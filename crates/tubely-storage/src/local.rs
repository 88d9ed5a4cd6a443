use crate::keys::validate_key;
use crate::signing::UrlSigner;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::LOCAL_BUCKET;

/// Local filesystem storage implementation
///
/// Objects are plain files below `base_path`. Reads go through HMAC-signed URLs under
/// `base_url`, which the HTTP layer verifies with the same [`UrlSigner`].
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signer: UrlSigner,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL the files are served from (e.g., "http://localhost:8091/assets")
    /// * `signer` - Signs read URLs handed out by [`Storage::presign_read`]
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signer: UrlSigner,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    /// Signer shared with the route that serves signed reads.
    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with traversal sequences, then checks that whatever already exists on
    /// disk for the key still resolves inside the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if !validate_key(storage_key) {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        if let Ok(canonical) = path.canonicalize() {
            let base_canonical = self.base_path.canonicalize().map_err(|e| {
                StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
            })?;
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn stored(&self, key: &str, size_bytes: u64) -> StoredObject {
        StoredObject {
            bucket: LOCAL_BUCKET.to_string(),
            key: key.to_string(),
            url: self.generate_url(key),
            size_bytes,
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_file(
        &self,
        key: &str,
        source: &Path,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let size = fs::copy(source, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                path.display(),
                e
            ))
        })?;

        let file = fs::File::open(&path).await?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.stored(key, size))
    }

    async fn put_bytes(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key)?;
        let size = data.len() as u64;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put_bytes successful"
        );

        Ok(self.stored(key, size))
    }

    async fn presign_read(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(key)?;
        let query = self
            .signer
            .sign(key, expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;
        Ok(format!("{}?{}", self.generate_url(key), query))
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let key = key.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Local storage stream download error");
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    fn bucket(&self) -> &str {
        LOCAL_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
