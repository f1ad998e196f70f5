//! Tubely Core Library
//!
//! This crate provides the domain model, error types and configuration shared by
//! the storage, processing, record store and HTTP crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{CreateVideoRequest, Video, VideoResponse};
pub use storage_types::StorageBackend;
