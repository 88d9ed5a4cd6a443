//! Fast-start remux through `ffmpeg`.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::ProcessingError;
use crate::scratch::ScratchFile;

/// Rewrites an MP4 so its index (`moov` atom) precedes the media data.
#[async_trait]
pub trait FastStartRewriter: Send + Sync {
    /// Write the rewritten file next to `input` and return a guard owning it.
    ///
    /// On error no output file is left behind. `input` is never modified.
    async fn rewrite(&self, input: &Path) -> Result<ScratchFile, ProcessingError>;
}

/// `<input>.processing`
pub fn processing_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".processing");
    PathBuf::from(name)
}

pub struct FfmpegFastStart {
    ffmpeg_path: String,
}

impl FfmpegFastStart {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl FastStartRewriter for FfmpegFastStart {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn rewrite(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        let start = std::time::Instant::now();
        // Armed before ffmpeg runs so a partial output is removed on failure.
        let output_file = ScratchFile::new(processing_path(input));

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                tool: "ffmpeg",
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_file.path().display(),
            "Fast-start remux completed"
        );

        Ok(output_file)
    }
}
