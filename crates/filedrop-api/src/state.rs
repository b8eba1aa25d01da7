//! Application state
//!
//! Everything here is read-only after startup and shared by reference across
//! requests; the pipeline itself keeps no per-request state outside the
//! request's own data, so no locking is needed.

use filedrop_core::{Config, UploadPolicy};
use filedrop_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub policy: UploadPolicy,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let policy = config.upload_policy();
        Self {
            config,
            policy,
            storage,
        }
    }
}
