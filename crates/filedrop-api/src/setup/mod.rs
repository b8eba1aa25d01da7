//! Application setup and initialization
//!
//! All bootstrap logic lives here so `main.rs` stays a thin wrapper and the
//! integration tests can build the same router with an injected storage
//! backend.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use filedrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
