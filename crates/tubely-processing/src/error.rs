use std::io;

use tubely_core::AppError;
use tubely_db::StoreError;
use tubely_storage::StorageError;
use uuid::Uuid;

/// Failures of the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    InvalidProbeOutput(#[from] serde_json::Error),

    #[error("No stream with dimensions found")]
    NoVideoStream,

    #[error("Invalid video dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Everything that can end an ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Couldn't find video {0}")]
    VideoNotFound(Uuid),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { limit_bytes: u64 },

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(StoreError),

    #[error("Scratch file error: {0}")]
    Io(#[from] io::Error),
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => IngestError::VideoNotFound(id),
            other => IngestError::Store(other),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::VideoNotFound(id) => {
                AppError::NotFound(format!("Couldn't find video {}", id))
            }
            IngestError::Unauthorized(msg) => AppError::Unauthorized(msg),
            IngestError::InvalidInput(msg) => AppError::InvalidInput(msg),
            IngestError::UnsupportedMediaType(media_type) => {
                AppError::UnsupportedMediaType(media_type)
            }
            err @ IngestError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            IngestError::Processing(e) => AppError::Processing(e.to_string()),
            IngestError::Storage(e) => AppError::Storage(e.to_string()),
            IngestError::Store(e) => e.into(),
            IngestError::Io(e) => AppError::Internal(format!("Scratch file error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(IngestError, u16)> = vec![
            (IngestError::VideoNotFound(Uuid::new_v4()), 404),
            (IngestError::Unauthorized("not yours".into()), 401),
            (IngestError::InvalidInput("bad form".into()), 400),
            (IngestError::UnsupportedMediaType("video/webm".into()), 400),
            (IngestError::PayloadTooLarge { limit_bytes: 1 }, 413),
            (ProcessingError::NoVideoStream.into(), 500),
            (StorageError::UploadFailed("503".into()).into(), 500),
            (io::Error::other("disk full").into(), 500),
        ];

        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.http_status_code(), status, "{:?}", app);
        }
    }

    #[test]
    fn test_store_not_found_becomes_video_not_found() {
        let id = Uuid::new_v4();
        let err: IngestError = StoreError::NotFound(id).into();
        assert!(matches!(err, IngestError::VideoNotFound(v) if v == id));
    }
}
