//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Multipart field carrying the video file
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Allowance on top of the file ceiling for multipart boundaries and part headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
