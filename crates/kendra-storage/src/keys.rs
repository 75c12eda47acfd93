//! Shared key and bucket validation for storage backends.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

/// Validate an object key supplied by a client.
///
/// Rejects empty keys, absolute keys, backslashes, surrounding whitespace and
/// empty, `..` or `.` segments. Stores normalize such keys to a different
/// object than the one the caller named. All backends must call this before
/// touching the store.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("file path must not be empty".to_string()));
    }
    if key.trim() != key {
        return Err(StorageError::InvalidKey(format!(
            "file path has leading or trailing whitespace: {:?}",
            key
        )));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "file path must be relative: {}",
            key
        )));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == ".." || segment == ".")
    {
        return Err(StorageError::InvalidKey(format!(
            "file path contains invalid segments: {}",
            key
        )));
    }
    Ok(())
}

/// Validate a bucket/container name supplied by a client.
pub fn validate_bucket(bucket: &str) -> StorageResult<()> {
    let valid = !bucket.is_empty()
        && bucket.len() <= 63
        && bucket
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !bucket.starts_with('.')
        && !bucket.contains("..");
    if !valid {
        return Err(StorageError::InvalidRequest(format!(
            "invalid bucket name: {}",
            bucket
        )));
    }
    Ok(())
}

/// Generate a key for uploads that arrive without a file path.
pub fn generate_upload_key() -> String {
    format!("uploads/{}", Uuid::new_v4())
}
