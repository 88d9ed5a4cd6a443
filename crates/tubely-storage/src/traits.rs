//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of object chunks returned by [`Storage::download_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A blob that has been durably written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    /// Unsigned URL of the object. Only usable when the object is publicly readable.
    pub url: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// Callers choose the key (see [`crate::keys`]); backends never invent one. Nothing is
/// retried here.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload the full contents of a local file as one object.
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StoredObject>;

    /// Upload an in-memory payload as one object.
    async fn put_bytes(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StoredObject>;

    /// Generate a presigned/temporary URL for direct read access (GET)
    ///
    /// The URL stays valid for at least `expires_in` from the moment of this call.
    async fn presign_read(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Download an object as a stream of chunks.
    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream>;

    /// Name of the bucket objects are written to.
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
