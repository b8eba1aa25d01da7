//! Filedrop Storage Library
//!
//! This crate provides the object-storage abstraction and its backends.
//! Backends write whole objects under caller-supplied keys and return a
//! deterministic public URL; they never retry on their own (retry policy
//! belongs to the caller).
//!
//! Keys must not contain `..` or a leading `/`; key derivation itself lives
//! in `filedrop-core` so the backends only have to enforce, not invent.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filedrop_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectVisibility, Storage, StorageError, StorageResult};
