/// Accepted content types for video uploads
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// Accepted content types for thumbnail uploads
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Common validation errors for uploads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing content type")]
    MissingContentType,

    #[error("Empty file")]
    EmptyFile,
}

/// Strip parameters from a declared content type and lower-case it.
///
/// `Video/MP4; codecs="avc1"` becomes `video/mp4`.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// File extension used when staging a validated media type (`video/mp4` -> `mp4`).
pub fn extension_for(media_type: &str) -> Option<&str> {
    media_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .filter(|subtype| {
            !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+')
        })
}

/// Upload validator
///
/// Checks the declared content type against an exact allow-list and the
/// payload size against a ceiling. Runs before anything touches disk.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    pub fn video(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            VIDEO_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn thumbnail(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            THUMBNAIL_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate content type, returning the normalized media type
    pub fn validate_content_type(
        &self,
        content_type: Option<&str>,
    ) -> Result<String, ValidationError> {
        let content_type = content_type.ok_or(ValidationError::MissingContentType)?;
        let normalized = normalize_mime_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}
