use super::aspect::AspectRatio;
use super::processor::VideoProcessor;
use super::service::FFmpegService;
use super::TranscodeError;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tempfile::TempPath;

/// Fast-start output plus the orientation it was classified as.
/// The output file is removed when this drops.
#[derive(Debug)]
pub struct ProcessedArtifact {
    path: TempPath,
    aspect: AspectRatio,
}

impl ProcessedArtifact {
    pub fn new(path: TempPath, aspect: AspectRatio) -> Self {
        Self { path, aspect }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the fast-start output, e.g. `<staged name>.processing`
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }
}

/// External media tooling used by the video upload pipeline.
#[async_trait]
pub trait MediaTranscoder: Send + Sync {
    /// Rewrite `input` for progressive playback into a new scratch file.
    async fn process_for_fast_start(&self, input: &Path) -> Result<TempPath, TranscodeError>;

    /// Classify the orientation of the first video stream in `input`.
    async fn probe_aspect_ratio(&self, input: &Path) -> Result<AspectRatio, TranscodeError>;

    /// Fast-start rewrite followed by an aspect probe of the staged original.
    async fn process(&self, staged: &Path) -> Result<ProcessedArtifact, TranscodeError> {
        let output = self.process_for_fast_start(staged).await?;
        let aspect = self.probe_aspect_ratio(staged).await?;
        Ok(ProcessedArtifact::new(output, aspect))
    }
}

/// `MediaTranscoder` backed by the ffmpeg and ffprobe binaries.
pub struct FFmpegTranscoder {
    service: FFmpegService,
    processor: VideoProcessor,
}

impl FFmpegTranscoder {
    pub fn new(
        ffmpeg_path: String,
        ffprobe_path: String,
        timeout: Duration,
    ) -> Result<Self, TranscodeError> {
        Ok(Self {
            service: FFmpegService::new(ffmpeg_path, timeout)?,
            processor: VideoProcessor::new(ffprobe_path, timeout)?,
        })
    }
}

#[async_trait]
impl MediaTranscoder for FFmpegTranscoder {
    async fn process_for_fast_start(&self, input: &Path) -> Result<TempPath, TranscodeError> {
        self.service.process_for_fast_start(input).await
    }

    async fn probe_aspect_ratio(&self, input: &Path) -> Result<AspectRatio, TranscodeError> {
        self.processor.probe_aspect_ratio(input).await
    }
}
