//! Configuration module
//!
//! Configuration is read once from the environment at startup and is
//! immutable afterwards. A missing required value is a startup-time fatal
//! condition, never a per-request error; `validate_storage_target` exists so
//! the request path can still re-check defensively.

use std::env;

use crate::storage_types::StorageBackend;
use crate::validation::UploadPolicy;

const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,pdf,txt";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub http_concurrency_limit: usize,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload policy
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?;

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| DEFAULT_HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be a valid number"))?,
            cors_origins,
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or_else(|| env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration coherence. Called at startup; failures here are fatal.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_extensions.is_empty() {
            anyhow::bail!("ALLOWED_EXTENSIONS must name at least one extension");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_MB must be greater than zero");
        }
        if self.http_concurrency_limit == 0 {
            anyhow::bail!("HTTP_CONCURRENCY_LIMIT must be greater than zero");
        }
        self.validate_storage_target()
    }

    /// Check that the configured storage backend has a usable target.
    ///
    /// Re-checked on the request path as well, so a process that somehow got
    /// past startup misconfigured still answers with a clean 500.
    pub fn validate_storage_target(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.as_deref().unwrap_or("").is_empty() {
                    anyhow::bail!("S3_BUCKET must be set when using the s3 storage backend");
                }
                if self.s3_region.as_deref().unwrap_or("").is_empty() {
                    anyhow::bail!(
                        "S3_REGION or AWS_REGION must be set when using the s3 storage backend"
                    );
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.as_deref().unwrap_or("").is_empty() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    );
                }
                if self.local_storage_base_url.as_deref().unwrap_or("").is_empty() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
                    );
                }
            }
        }
        Ok(())
    }

    /// Upload policy derived from this configuration.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.allowed_extensions.clone(), self.max_file_size_bytes)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
