//! Canonical object reference stored on video records.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::traits::{StorageError, StorageResult};

const SEPARATOR: char = ',';

/// Location of a published object: `(bucket, key)`.
///
/// Rendered as `bucket,key`. Parsing only succeeds when the value splits into
/// exactly two non-empty parts, so absolute URLs and legacy values never parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    bucket: String,
    key: String,
}

impl ObjectReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> StorageResult<Self> {
        let bucket = bucket.into();
        let key = key.into();

        if bucket.is_empty() || key.is_empty() {
            return Err(StorageError::InvalidKey(
                "Bucket and key must not be empty".to_string(),
            ));
        }
        if bucket.contains(SEPARATOR) || key.contains(SEPARATOR) {
            return Err(StorageError::InvalidKey(format!(
                "Bucket and key must not contain '{}'",
                SEPARATOR
            )));
        }

        Ok(Self { bucket, key })
    }

    /// Parse a stored `bucket,key` value. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(SEPARATOR);
        let bucket = parts.next()?;
        let key = parts.next()?;
        if parts.next().is_some() || bucket.is_empty() || key.is_empty() {
            return None;
        }

        Some(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Display for ObjectReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.key)
    }
}
