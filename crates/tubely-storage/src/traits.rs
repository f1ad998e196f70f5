//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::reference::ObjectReference;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// upload pipeline never depends on a concrete backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new objects are written to.
    fn bucket(&self) -> &str;

    /// Store `data` under `key` in the configured bucket, tagged with
    /// `content_type`. Returns the reference to persist.
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<ObjectReference>;

    /// Store the contents of a local file under `key`. Backends stream the
    /// file rather than reading it into memory.
    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        path: &Path,
    ) -> StorageResult<ObjectReference>;

    /// Produce a time-limited GET URL for a stored object.
    async fn presign_get(
        &self,
        reference: &ObjectReference,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Read an object from the configured bucket
    async fn get_object(&self, key: &str) -> StorageResult<Bytes>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
