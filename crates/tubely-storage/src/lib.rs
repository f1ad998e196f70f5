//! Tubely Storage Library
//!
//! Object storage abstraction with S3 and local filesystem backends.
//!
//! # Object references
//!
//! Published objects are recorded as an [`ObjectReference`], persisted in the
//! canonical text form `bucket,key`. Read paths turn a reference into a
//! time-limited GET URL with [`Storage::presign_get`].
//!
//! # Key format
//!
//! Video keys are `{aspect}/{filename}` where aspect is one of `landscape`,
//! `portrait` or `other`. Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod reference;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{object_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::{LocalStorage, LocalUrlSigner};
pub use reference::ObjectReference;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
