//! Mock Storage implementation for testing

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tubely_storage::{
    ByteStream, Storage, StorageBackend, StorageError, StorageResult, StoredObject,
};

pub const MOCK_BUCKET: &str = "test-bucket";
const MOCK_BASE_URL: &str = "https://test-bucket.storage.test";

#[derive(Debug, Clone)]
pub struct MockObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Mock storage implementation that stores objects in memory
///
/// Presigned URLs look like `https://test-bucket.storage.test/{key}?expires_in={secs}`.
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, MockObject>>>,
    fail_uploads: AtomicBool,
    fail_presigns: AtomicBool,
    presigns: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_uploads: AtomicBool::new(false),
            fail_presigns: AtomicBool::new(false),
            presigns: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent presign fail.
    pub fn fail_presigns(&self, fail: bool) {
        self.fail_presigns.store(fail, Ordering::SeqCst);
    }

    /// Get an object (for test assertions)
    pub fn object(&self, key: &str) -> Option<MockObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of presigned URLs handed out so far
    pub fn presign_count(&self) -> usize {
        self.presigns.load(Ordering::SeqCst)
    }

    fn store(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("simulated upload failure".to_string()));
        }

        let size_bytes = data.len() as u64;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(StoredObject {
            bucket: MOCK_BUCKET.to_string(),
            key: key.to_string(),
            url: format!("{}/{}", MOCK_BASE_URL, key),
            size_bytes,
        })
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        let data = tokio::fs::read(path).await?;
        self.store(key, Bytes::from(data), content_type)
    }

    async fn put_bytes(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        self.store(key, data, content_type)
    }

    async fn presign_read(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.fail_presigns.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed("simulated presign failure".to_string()));
        }
        self.presigns.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "{}/{}?expires_in={}",
            MOCK_BASE_URL,
            key,
            expires_in.as_secs()
        ))
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let object = self
            .object(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(Box::pin(stream::once(async move { Ok(object.data) })))
    }

    fn bucket(&self) -> &str {
        MOCK_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
