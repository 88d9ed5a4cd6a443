//! Stream inspection through `ffprobe`.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tubely_core::models::AspectRatio;

use crate::error::ProcessingError;
use crate::video::aspect::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn aspect_ratio(&self) -> AspectRatio {
        classify(self.width, self.height)
    }
}

/// Reads frame dimensions from a media file.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Dimensions of the first stream in `ffprobe -print_format json -show_streams` output
/// that carries a width and height.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)?;

    let (width, height) = output
        .streams
        .iter()
        .find_map(|s| Some((s.width?, s.height?)))
        .ok_or(ProcessingError::NoVideoStream)?;

    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }

    Ok(VideoDimensions { width, height })
}

pub struct FfprobeInspector {
    ffprobe_path: String,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                tool: "ffprobe",
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::ToolFailed {
                tool: "ffprobe",
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            "Stream inspection completed"
        );

        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_stream_with_dimensions() {
        let stdout = br#"{
            "streams": [
                {"index": 0, "codec_type": "audio", "sample_rate": "48000"},
                {"index": 1, "codec_type": "video", "width": 1920, "height": 1080},
                {"index": 2, "codec_type": "video", "width": 320, "height": 180}
            ]
        }"#;

        let dims = parse_probe_output(stdout).unwrap();
        assert_eq!(dims, VideoDimensions { width: 1920, height: 1080 });
        assert_eq!(dims.aspect_ratio(), AspectRatio::Landscape);
    }

    #[test]
    fn test_no_streams_is_fatal() {
        assert!(matches!(
            parse_probe_output(br#"{"streams": []}"#),
            Err(ProcessingError::NoVideoStream)
        ));
        assert!(matches!(
            parse_probe_output(b"{}"),
            Err(ProcessingError::NoVideoStream)
        ));
    }

    #[test]
    fn test_zero_dimensions_are_fatal() {
        let result = parse_probe_output(br#"{"streams": [{"width": 0, "height": 720}]}"#);
        assert!(matches!(
            result,
            Err(ProcessingError::InvalidDimensions { width: 0, height: 720 })
        ));
    }

    #[test]
    fn test_garbage_output() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(ProcessingError::InvalidProbeOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let inspector = FfprobeInspector::new("/nonexistent/ffprobe");
        let result = inspector.probe(Path::new("clip.mp4")).await;
        assert!(matches!(result, Err(ProcessingError::Spawn { .. })));
    }
}
