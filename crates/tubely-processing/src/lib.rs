//! Tubely Processing Library
//!
//! The ingestion pipeline and the external-process wrappers it drives: `ffprobe` for stream
//! dimensions and `ffmpeg` for the fast-start remux.

pub mod error;
pub mod ingest;
pub mod scratch;
pub mod video;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::{IngestError, ProcessingError};
pub use ingest::{IngestionConfig, IngestionPipeline, StorageThumbnailStore};
pub use scratch::ScratchFile;
pub use video::{
    classify, FastStartRewriter, FfmpegFastStart, FfprobeInspector, MediaInspector,
    VideoDimensions,
};
