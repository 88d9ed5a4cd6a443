//! Tubely Storage Library
//!
//! Object storage abstraction with S3 and local filesystem backends.
//!
//! # Key format
//!
//! Videos live under their aspect-ratio class, `{landscape|portrait|other}/{random}.mp4`;
//! thumbnails under `thumbnails/{video_id}.{ext}`. Keys must not contain `..` or a leading
//! `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{thumbnail_key, video_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signing::UrlSigner;
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
pub use tubely_core::StorageBackend;
