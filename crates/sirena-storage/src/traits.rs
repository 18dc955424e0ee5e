//! Storage abstraction trait
//!
//! Defines the MediaStore trait the intake pipeline writes through, so the
//! pipeline and its tests do not couple to a concrete filesystem layout.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Kind of uploaded media; determines the key prefix under the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Voice,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
        }
    }
}

/// Generate the relative storage key for a media file.
///
/// Always forward-slash separated, regardless of host platform.
pub fn media_key(kind: MediaKind, filename: &str) -> String {
    format!("{}/{}", kind.as_str(), filename)
}

/// Media storage abstraction.
///
/// Backends own the durable bytes; callers hold only relative keys. Uploaded
/// files are never removed as a side effect of pipeline failure, so raw
/// evidence survives even when no record is written.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write a media file and return its relative storage key.
    async fn put(&self, kind: MediaKind, filename: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Delete a file by its storage key. Deleting a missing file is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether a file exists for the given key.
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_key_uses_forward_slashes() {
        assert_eq!(media_key(MediaKind::Voice, "a.webm"), "voice/a.webm");
        assert_eq!(media_key(MediaKind::Video, "b.mp4"), "video/b.mp4");
    }
}
