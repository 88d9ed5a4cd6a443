//! Record stores
//!
//! The pipeline only needs to read a video row and write it back, so everything here sits
//! behind two small traits: [`VideoRecordStore`] for video rows (Postgres or in-memory) and
//! [`ThumbnailStore`] for thumbnail payloads.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod thumbnail;
pub mod video;

pub use error::StoreError;
pub use memory::InMemoryVideoRepository;
pub use postgres::PgVideoRepository;
pub use thumbnail::{InMemoryThumbnailStore, ThumbnailStore};
pub use video::VideoRecordStore;
