//! FFmpegService - container rewrite for progressive playback.

use super::command::{canonical_input, run_tool, validate_tool_path};
use super::TranscodeError;
use crate::staging::create_scratch_file;
use std::path::Path;
use std::time::Duration;
use tempfile::TempPath;
use tokio::process::Command;

/// Suffix appended to the input file name for the fast-start output
pub const PROCESSING_SUFFIX: &str = ".processing";

pub struct FFmpegService {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FFmpegService {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, TranscodeError> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    /// Copy streams into a new MP4 with the `moov` atom moved to the front.
    ///
    /// Output goes to `<input>.processing` next to the input and is removed
    /// when the returned guard drops, including on failure.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn process_for_fast_start(&self, input_path: &Path) -> Result<TempPath, TranscodeError> {
        let start = std::time::Instant::now();
        let validated_path = canonical_input(input_path)?;

        let (dir, file_name) = match (validated_path.parent(), validated_path.file_name()) {
            (Some(dir), Some(name)) => (dir, name.to_string_lossy()),
            _ => {
                return Err(TranscodeError::InvalidPath(
                    validated_path.display().to_string(),
                ))
            }
        };

        let output_name = format!("{}{}", file_name, PROCESSING_SUFFIX);
        let (file, output_path) =
            create_scratch_file(dir, &output_name).map_err(TranscodeError::Scratch)?;
        drop(file);

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(&validated_path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&*output_path);

        run_tool("ffmpeg", command, self.timeout).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start rewrite completed"
        );

        Ok(output_path)
    }
}
