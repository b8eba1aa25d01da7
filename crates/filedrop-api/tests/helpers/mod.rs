//! Shared setup for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use filedrop_api::setup::routes::setup_routes;
use filedrop_api::state::AppState;
use filedrop_core::{Config, StorageBackend};
use filedrop_storage::{LocalStorage, ObjectVisibility, Storage, StorageError, StorageResult};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const TEST_BASE_URL: &str = "http://localhost:3000/files";

/// Test application with an isolated local storage directory.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Path of a stored object in the test storage directory.
    pub fn stored_path(&self, key: &str) -> std::path::PathBuf {
        self.temp_dir.path().join(key)
    }
}

pub fn test_config(storage_path: &Path, max_bytes: u64) -> Config {
    Config {
        server_port: 0,
        http_concurrency_limit: 1024,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some(storage_path.to_string_lossy().into_owned()),
        local_storage_base_url: Some(TEST_BASE_URL.to_string()),
        max_file_size_bytes: max_bytes,
        allowed_extensions: vec![
            "jpg".to_string(),
            "jpeg".to_string(),
            "png".to_string(),
            "gif".to_string(),
            "pdf".to_string(),
            "txt".to_string(),
        ],
    }
}

/// Setup a test application backed by local storage in a temp directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(TEST_MAX_BYTES).await
}

/// Same, with a custom size limit (keeps boundary tests cheap).
pub async fn setup_test_app_with_limit(max_bytes: u64) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path(), max_bytes);
    let storage = LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");

    let server = build_server(config, Arc::new(storage));
    TestApp { server, temp_dir }
}

/// Setup a test application whose storage backend always fails with `code`.
pub async fn setup_failing_storage_app(code: &str) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path(), TEST_MAX_BYTES);
    let storage = FailingStorage {
        code: code.to_string(),
    };

    let server = build_server(config, Arc::new(storage));
    TestApp { server, temp_dir }
}

/// Setup a test application whose storage fails transiently `failures` times
/// before succeeding, to exercise the orchestrator's retry loop.
pub async fn setup_flaky_storage_app(failures: u32) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path(), TEST_MAX_BYTES);
    let inner = LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    let storage = FlakyStorage {
        failures_remaining: AtomicU32::new(failures),
        inner,
    };

    let server = build_server(config, Arc::new(storage));
    TestApp { server, temp_dir }
}

fn build_server(config: Config, storage: Arc<dyn Storage>) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}

/// Storage double that rejects every write with a fixed provider code.
pub struct FailingStorage {
    code: String,
}

#[async_trait]
impl Storage for FailingStorage {
    async fn put(
        &self,
        _key: &str,
        _content_type: &str,
        _data: Bytes,
        _visibility: ObjectVisibility,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed {
            code: self.code.clone(),
            detail: "simulated provider failure".to_string(),
        })
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError(
            "simulated provider failure".to_string(),
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Storage double that fails with a throttling code N times, then delegates.
pub struct FlakyStorage {
    failures_remaining: AtomicU32,
    inner: LocalStorage,
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
        visibility: ObjectVisibility,
    ) -> StorageResult<String> {
        if self.failures_remaining.load(Ordering::SeqCst) > 0 {
            self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
            return Err(StorageError::UploadFailed {
                code: "SlowDown".to_string(),
                detail: "simulated throttling".to_string(),
            });
        }
        self.inner.put(key, content_type, data, visibility).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
