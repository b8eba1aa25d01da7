//! Upload orchestrator
//!
//! One run per request: extract -> validate extension -> validate size ->
//! derive key -> store. The key is derived only after both policy checks
//! pass. Transient storage errors get a bounded retry with backoff;
//! validation and sanitation errors are never retried.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Multipart;
use bytes::Bytes;
use filedrop_core::validation::{validate_extension, validate_size};
use filedrop_core::{storage_key, AppError};
use filedrop_storage::ObjectVisibility;

use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

const MAX_STORAGE_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Everything the HTTP layer needs to build the success response.
#[derive(Debug)]
pub struct UploadData {
    pub key: String,
    pub url: String,
    pub size: u64,
}

/// Upload orchestration service
pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Complete upload workflow for one request.
    pub async fn upload(&self, multipart: Multipart) -> Result<UploadData, AppError> {
        // Startup already validated the storage target; re-check so a
        // misconfigured process still answers with a clean 500.
        self.state
            .config
            .validate_storage_target()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let file = extract_multipart_file(multipart).await?;

        // Extension before size: the cheaper check runs first, and the
        // ordering is part of the contract.
        validate_extension(&file.original_filename, &self.state.policy)?;
        let size = file.data.len() as u64;
        validate_size(size, &self.state.policy)?;

        let key = storage_key(&file.original_filename)?;
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        tracing::info!(
            original_filename = %file.original_filename,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            "Processing upload"
        );

        let url = self.put_with_retry(&key, &content_type, file.data).await?;

        tracing::info!(key = %key, url = %url, "Upload to storage successful");

        Ok(UploadData { key, url, size })
    }

    /// Store the object, retrying transient provider errors with backoff.
    async fn put_with_retry(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .state
                .storage
                .put(key, content_type, data.clone(), ObjectVisibility::PublicRead)
                .await
            {
                Ok(url) => return Ok(url),
                Err(e) if e.is_transient() && attempt < MAX_STORAGE_ATTEMPTS => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        error = %e,
                        key = %key,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient storage error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, key = %key, "Failed to upload to storage");
                    return Err(AppError::Storage {
                        code: e.provider_code().unwrap_or("unknown").to_string(),
                        detail: e.to_string(),
                    });
                }
            }
        }
    }
}
