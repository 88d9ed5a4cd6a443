//! Tubely Core Library
//!
//! Domain models, error types and configuration shared by every Tubely crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ThumbnailStoreKind, VideoUrlMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
