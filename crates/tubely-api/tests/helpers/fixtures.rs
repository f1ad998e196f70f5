//! Test fixtures: upload payloads and a scripted media transcoder.

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use futures::future::BoxFuture;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempPath;
use tubely_processing::{AspectRatio, MediaTranscoder, TranscodeError};

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Bytes standing in for an MP4 container; the fake transcoder never parses them.
pub fn create_test_mp4() -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypmp42");
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(b"moov");
    data.extend(std::iter::repeat(0xAB).take(1024));
    data
}

/// Single-part form with `data` under `field`.
pub fn file_form(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn video_form(data: Vec<u8>) -> MultipartForm {
    file_form("video", data, "boots.mp4", "video/mp4")
}

/// What the fake transcoder does on the next calls.
#[derive(Debug, Clone, Copy)]
pub enum TranscodeOutcome {
    Succeed(AspectRatio),
    FailFastStart,
    NoVideoStream,
}

/// `MediaTranscoder` double: copies the input to `<input>.processing` and
/// reports a scripted aspect ratio.
pub struct FakeTranscoder {
    outcome: Mutex<TranscodeOutcome>,
    calls: AtomicUsize,
    outputs: Mutex<Vec<PathBuf>>,
    during_process: Mutex<Option<BoxFuture<'static, ()>>>,
}

impl Default for FakeTranscoder {
    fn default() -> Self {
        Self {
            outcome: Mutex::new(TranscodeOutcome::Succeed(AspectRatio::Landscape)),
            calls: AtomicUsize::new(0),
            outputs: Mutex::new(Vec::new()),
            during_process: Mutex::new(None),
        }
    }
}

impl FakeTranscoder {
    pub fn set_outcome(&self, outcome: TranscodeOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Run `work` inside the next fast-start call, standing in for whatever
    /// else happens while a long rewrite is in flight.
    pub fn during_process(&self, work: impl Future<Output = ()> + Send + 'static) {
        *self.during_process.lock().unwrap() = Some(Box::pin(work));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths of every fast-start output produced so far.
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().clone()
    }

    fn outcome(&self) -> TranscodeOutcome {
        *self.outcome.lock().unwrap()
    }
}

#[async_trait]
impl MediaTranscoder for FakeTranscoder {
    async fn process_for_fast_start(&self, input: &Path) -> Result<TempPath, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let work = self.during_process.lock().unwrap().take();
        if let Some(work) = work {
            work.await;
        }
        if let TranscodeOutcome::FailFastStart = self.outcome() {
            return Err(TranscodeError::Failed {
                tool: "ffmpeg",
                status: Some(1),
                stderr: "moov atom not found".to_string(),
            });
        }

        let dir = input.parent().expect("staged file has a parent");
        let name = input.file_name().expect("staged file has a name");
        let mut output = tempfile::Builder::new()
            .prefix(&format!("{}.processing", name.to_string_lossy()))
            .suffix("")
            .rand_bytes(0)
            .tempfile_in(dir)
            .map_err(TranscodeError::Scratch)?;
        let mut source = std::fs::File::open(input).map_err(TranscodeError::Scratch)?;
        std::io::copy(&mut source, &mut output).map_err(TranscodeError::Scratch)?;

        let path = output.into_temp_path();
        self.outputs.lock().unwrap().push(path.to_path_buf());
        Ok(path)
    }

    async fn probe_aspect_ratio(&self, _input: &Path) -> Result<AspectRatio, TranscodeError> {
        match self.outcome() {
            TranscodeOutcome::Succeed(aspect) => Ok(aspect),
            TranscodeOutcome::NoVideoStream => Err(TranscodeError::NoVideoStream),
            TranscodeOutcome::FailFastStart => Err(TranscodeError::InvalidProbeOutput(
                "unreachable".to_string(),
            )),
        }
    }
}
