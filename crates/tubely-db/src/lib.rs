//! Tubely record store
//!
//! Video records and thumbnail bytes behind repository traits. The shipped
//! implementations keep records in memory and thumbnails in memory or on disk.

pub mod db;

pub use db::thumbnail::{
    FileThumbnailStore, InMemoryThumbnailStore, Thumbnail, ThumbnailStoreTrait,
};
pub use db::video::{InMemoryVideoRepository, VideoRepositoryTrait};
