//! Scratch staging for uploads.
//!
//! Each upload is copied into `<scratch>/<random>.<ext>`, where `<random>` is
//! 32 bytes from the thread-local CSPRNG encoded as unpadded base64url. The
//! file is created exclusively and removed when the [`StagedUpload`] drops.

use base64::Engine;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use rand::RngCore;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::validator::extension_for;

const RANDOM_NAME_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Failed to create scratch file: {0}")]
    Create(#[source] io::Error),

    #[error("Failed to write scratch file: {0}")]
    Write(#[source] io::Error),

    #[error("Upload stream failed: {0}")]
    Read(String),

    #[error("Upload exceeds {max} bytes")]
    TooLarge { max: usize },

    #[error("Empty file")]
    Empty,

    #[error("No file extension for media type {0}")]
    UnknownExtension(String),
}

/// Unguessable file name for a staged upload: `<base64url(32 random bytes)>.<ext>`.
pub fn random_file_name(extension: &str) -> String {
    let mut bytes = [0u8; RANDOM_NAME_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!(
        "{}.{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes),
        extension
    )
}

/// Create `<dir>/<name>` exclusively and hand back the open file with a guard
/// that removes it on drop.
pub(crate) fn create_scratch_file(
    dir: &Path,
    name: &str,
) -> io::Result<(std::fs::File, TempPath)> {
    let file = tempfile::Builder::new()
        .prefix(name)
        .suffix("")
        .rand_bytes(0)
        .tempfile_in(dir)?;
    Ok(file.into_parts())
}

/// An upload copied to scratch storage. Dropping it deletes the file.
#[derive(Debug)]
pub struct StagedUpload {
    file_name: String,
    media_type: String,
    size: u64,
    path: TempPath,
}

impl StagedUpload {
    /// Random `<name>.<ext>` the upload was staged under
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copies upload streams into scratch files.
#[derive(Debug, Clone)]
pub struct Stager {
    scratch_dir: PathBuf,
}

impl Stager {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Stage `stream` as a file of the given (already validated) media type.
    ///
    /// Fails with `TooLarge` once more than `max_bytes` arrive and with `Empty`
    /// when the stream carries no data. The partial file is removed on every
    /// error path.
    #[tracing::instrument(skip(self, stream), fields(scratch_dir = %self.scratch_dir.display()))]
    pub async fn stage<S>(
        &self,
        media_type: &str,
        max_bytes: usize,
        stream: S,
    ) -> Result<StagedUpload, StagingError>
    where
        S: Stream<Item = Result<Bytes, StagingError>>,
    {
        let mut stream = std::pin::pin!(stream);
        let extension = extension_for(media_type)
            .ok_or_else(|| StagingError::UnknownExtension(media_type.to_string()))?;
        let file_name = random_file_name(extension);

        let (file, path) =
            create_scratch_file(&self.scratch_dir, &file_name).map_err(StagingError::Create)?;
        let mut file = tokio::fs::File::from_std(file);

        let start = std::time::Instant::now();
        let mut size: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            size += chunk.len() as u64;
            if size > max_bytes as u64 {
                return Err(StagingError::TooLarge { max: max_bytes });
            }
            file.write_all(&chunk).await.map_err(StagingError::Write)?;
        }

        if size == 0 {
            return Err(StagingError::Empty);
        }

        file.flush().await.map_err(StagingError::Write)?;
        file.sync_all().await.map_err(StagingError::Write)?;

        tracing::debug!(
            file_name = %file_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(StagedUpload {
            file_name,
            media_type: media_type.to_string(),
            size,
            path,
        })
    }
}
