//! Shared key rules for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Build the object key for a published file: `{prefix}/{filename}`.
pub fn object_key(prefix: &str, filename: &str) -> StorageResult<String> {
    let key = format!("{}/{}", prefix, filename);
    validate_key(&key)?;
    Ok(key)
}

/// Reject keys that could escape a bucket or break the `bucket,key` encoding.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains("..")
        || key.contains(',')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_prefixes_filename() {
        assert_eq!(
            object_key("landscape", "AbC-_x.mp4").unwrap(),
            "landscape/AbC-_x.mp4"
        );
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs/path").is_err());
        assert!(validate_key("other/a,b.mp4").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("portrait/ok.mp4").is_ok());
    }
}
