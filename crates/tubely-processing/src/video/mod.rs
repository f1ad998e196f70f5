//! Video pipeline tools: ffmpeg fast-start rewrite and ffprobe aspect probe.

pub mod aspect;
mod command;
pub mod processor;
pub mod service;
pub mod transcoder;

pub use aspect::AspectRatio;
pub use processor::VideoProcessor;
pub use service::FFmpegService;
pub use transcoder::{FFmpegTranscoder, MediaTranscoder, ProcessedArtifact};

use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("{tool} failed (exit status {status:?}): {stderr}")]
    Failed {
        tool: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    InvalidProbeOutput(String),

    #[error("No valid video stream found")]
    NoVideoStream,

    #[error("Scratch file error: {0}")]
    Scratch(#[source] io::Error),
}
