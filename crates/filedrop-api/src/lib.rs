//! Filedrop API Library
//!
//! HTTP surface for the upload pipeline: the multipart extractor, the upload
//! orchestrator, error-to-response mapping, and application bootstrap. The
//! binary in `main.rs` is a thin wrapper; everything here is also reachable
//! from the integration tests.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
