//! Filedrop Core Library
//!
//! This crate provides the configuration, error types, upload policy
//! validation, and storage-key derivation shared by the other Filedrop
//! components.

pub mod config;
pub mod error;
pub mod keys;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use keys::{sanitize_filename, storage_key};
pub use storage_types::StorageBackend;
pub use validation::UploadPolicy;
