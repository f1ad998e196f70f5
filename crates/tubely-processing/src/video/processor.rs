//! Video processor - ffprobe stream inspection

use super::aspect::AspectRatio;
use super::command::{canonical_input, run_tool, validate_tool_path};
use super::TranscodeError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

/// Classify ffprobe `-show_streams` JSON. The first stream that is a video
/// stream (or does not say) decides.
pub fn parse_probe_output(stdout: &[u8]) -> Result<AspectRatio, TranscodeError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| TranscodeError::InvalidProbeOutput(e.to_string()))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .ok_or(TranscodeError::NoVideoStream)?;

    if stream.height == 0 {
        return Err(TranscodeError::NoVideoStream);
    }

    Ok(AspectRatio::from_dimensions(stream.width, stream.height))
}

pub struct VideoProcessor {
    ffprobe_path: String,
    timeout: Duration,
}

impl VideoProcessor {
    pub fn new(ffprobe_path: String, timeout: Duration) -> Result<Self, TranscodeError> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }

    /// Probe a file's first video stream and classify its orientation
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe_aspect_ratio(&self, video_path: &Path) -> Result<AspectRatio, TranscodeError> {
        let start = std::time::Instant::now();
        let validated_path = canonical_input(video_path)?;

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(&validated_path);

        let output = run_tool("ffprobe", command, self.timeout).await?;
        let aspect = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            aspect = %aspect,
            "Video probe completed"
        );

        Ok(aspect)
    }
}
