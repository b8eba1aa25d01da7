use crate::traits::{ObjectVisibility, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Used for development and tests. Objects land under `base_path` and are
/// assumed to be served from `base_url` by something else (visibility is a
/// property of whatever serves `base_url`, so the ACL argument is ignored).
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/filedrop/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a filesystem path, refusing anything that
    /// could escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        data: Bytes,
        _visibility: ObjectVisibility,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed {
                code: "io".to_string(),
                detail: format!("Failed to create file {}: {}", path.display(), e),
            }
        })?;

        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed {
                code: "io".to_string(),
                detail: format!("Failed to write file {}: {}", path.display(), e),
            })?;

        file.sync_all()
            .await
            .map_err(|e| StorageError::UploadFailed {
                code: "io".to_string(),
                detail: format!("Failed to sync file {}: {}", path.display(), e),
            })?;

        let url = self.generate_url(key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
