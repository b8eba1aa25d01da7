//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Provider error codes that are worth retrying. Everything else (permission
/// denied, bucket not found, malformed key) fails immediately.
const TRANSIENT_CODES: &[&str] = &[
    "timeout",
    "network",
    "RequestTimeout",
    "SlowDown",
    "InternalError",
    "ServiceUnavailable",
    "Throttling",
    "ThrottlingException",
];

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed ({code}): {detail}")]
    UploadFailed { code: String, detail: String },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// The provider's error code, when the backend reported one.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            StorageError::UploadFailed { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether a retry has a chance of succeeding (timeout, throttling).
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::UploadFailed { code, .. } => TRANSIENT_CODES
                .iter()
                .any(|c| c.eq_ignore_ascii_case(code)),
            StorageError::IoError(_) => true,
            _ => false,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Per-object access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectVisibility {
    /// Retrievable by unauthenticated third parties via the returned URL.
    #[default]
    PublicRead,
    Private,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the upload pipeline can work with any backend without coupling to
/// implementation details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a whole object under `key` and return its public URL.
    ///
    /// Returns only after the backend has acknowledged the write. The URL is
    /// constructed deterministically from the storage target and the key; no
    /// read-back is performed.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
        visibility: ObjectVisibility,
    ) -> StorageResult<String>;

    /// Check if an object exists (used by the health probe).
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let throttled = StorageError::UploadFailed {
            code: "SlowDown".into(),
            detail: "rate exceeded".into(),
        };
        assert!(throttled.is_transient());

        let timeout = StorageError::UploadFailed {
            code: "timeout".into(),
            detail: "no response".into(),
        };
        assert!(timeout.is_transient());

        let denied = StorageError::UploadFailed {
            code: "AccessDenied".into(),
            detail: "forbidden".into(),
        };
        assert!(!denied.is_transient());

        let no_bucket = StorageError::UploadFailed {
            code: "NoSuchBucket".into(),
            detail: "missing".into(),
        };
        assert!(!no_bucket.is_transient());

        assert!(!StorageError::ConfigError("no bucket".into()).is_transient());
    }

    #[test]
    fn test_provider_code_surfaced_for_uploads_only() {
        let err = StorageError::UploadFailed {
            code: "InternalError".into(),
            detail: "500".into(),
        };
        assert_eq!(err.provider_code(), Some("InternalError"));
        assert_eq!(StorageError::InvalidKey("..".into()).provider_code(), None);
    }
}
