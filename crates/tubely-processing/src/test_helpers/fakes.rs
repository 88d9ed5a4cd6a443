//! Stand-ins for `ffprobe` and `ffmpeg`

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use crate::error::ProcessingError;
use crate::scratch::ScratchFile;
use crate::video::faststart::processing_path;
use crate::video::{FastStartRewriter, MediaInspector, VideoDimensions};

/// Reports fixed dimensions, or a queued error once.
pub struct FakeInspector {
    dimensions: VideoDimensions,
    error: Mutex<Option<ProcessingError>>,
}

impl FakeInspector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: VideoDimensions { width, height },
            error: Mutex::new(None),
        }
    }

    pub fn failing(error: ProcessingError) -> Self {
        let inspector = Self::new(0, 0);
        *inspector.error.lock().unwrap() = Some(error);
        inspector
    }
}

#[async_trait]
impl MediaInspector for FakeInspector {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }
        // The pipeline must only inspect files that still exist.
        if !path.exists() {
            return Err(ProcessingError::Spawn {
                tool: "ffprobe",
                source: io::Error::new(io::ErrorKind::NotFound, "inspected a missing file"),
            });
        }
        Ok(self.dimensions)
    }
}

/// Copies the input to `<input>.processing` unchanged.
pub struct CopyRewriter {
    fail: bool,
}

impl CopyRewriter {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// Leaves a partial output behind and then fails, like a crashed ffmpeg.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for CopyRewriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FastStartRewriter for CopyRewriter {
    async fn rewrite(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        let output = ScratchFile::new(processing_path(input));

        if self.fail {
            tokio::fs::write(output.path(), b"partial")
                .await
                .map_err(|source| ProcessingError::Spawn {
                    tool: "ffmpeg",
                    source,
                })?;
            return Err(ProcessingError::Spawn {
                tool: "ffmpeg",
                source: io::Error::other("simulated remux failure"),
            });
        }

        tokio::fs::copy(input, output.path())
            .await
            .map_err(|source| ProcessingError::Spawn {
                tool: "ffmpeg",
                source,
            })?;
        Ok(output)
    }
}
