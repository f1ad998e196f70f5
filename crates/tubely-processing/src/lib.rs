//! Tubely Processing Library
//!
//! Upload validation, scratch staging and the external media tools used by the
//! video pipeline.

pub mod staging;
pub mod validator;
#[cfg(feature = "video")]
pub mod video;

pub use staging::{StagedUpload, Stager, StagingError};
pub use validator::{extension_for, normalize_mime_type, MediaValidator, ValidationError};
#[cfg(feature = "video")]
pub use video::{
    AspectRatio, FFmpegService, FFmpegTranscoder, MediaTranscoder, ProcessedArtifact,
    TranscodeError, VideoProcessor,
};
