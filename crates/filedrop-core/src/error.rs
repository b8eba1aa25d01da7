//! Error types module
//!
//! All request-level failures are unified under the `AppError` enum. The HTTP
//! adapter never matches on variants directly; it goes through the
//! `ErrorMetadata` trait, which maps each variant to a status code, an
//! optional machine-readable reason, a client-safe message, and a log level.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable rejection reason (client input errors only)
    fn reason(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Extra diagnostic detail safe to expose (e.g. a provider error code)
    fn details(&self) -> Option<String>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("no part named 'file' in request body")]
    MissingFilePart,

    #[error("file part has no filename")]
    EmptyFilename,

    #[error("filename '{0}' has no extension")]
    NoExtension(String),

    #[error("extension '{extension}' is not allowed")]
    ExtensionNotAllowed {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("file of {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("filename '{0}' cannot be turned into a safe storage key")]
    UnsafeFilename(String),

    #[error("storage error ({code}): {detail}")]
    Storage { code: String, detail: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MalformedMultipart(_) => "MalformedMultipart",
            AppError::MissingFilePart => "MissingFilePart",
            AppError::EmptyFilename => "EmptyFilename",
            AppError::NoExtension(_) => "NoExtension",
            AppError::ExtensionNotAllowed { .. } => "ExtensionNotAllowed",
            AppError::TooLarge { .. } => "TooLarge",
            AppError::UnsafeFilename(_) => "UnsafeFilename",
            AppError::Storage { .. } => "Storage",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Whether this is a client input error (HTTP 400 class).
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::MalformedMultipart(_)
            | AppError::MissingFilePart
            | AppError::EmptyFilename
            | AppError::NoExtension(_)
            | AppError::ExtensionNotAllowed { .. }
            | AppError::TooLarge { .. }
            | AppError::UnsafeFilename(_) => 400,
            AppError::Storage { .. } | AppError::Config(_) | AppError::Internal(_) => 500,
        }
    }

    fn reason(&self) -> Option<&'static str> {
        match self {
            AppError::MalformedMultipart(_) => Some("malformed_multipart"),
            AppError::MissingFilePart => Some("missing_file"),
            AppError::EmptyFilename => Some("empty_filename"),
            AppError::NoExtension(_) => Some("no_extension"),
            AppError::ExtensionNotAllowed { .. } => Some("extension_not_allowed"),
            AppError::TooLarge { .. } => Some("too_large"),
            AppError::UnsafeFilename(_) => Some("unsafe_filename"),
            AppError::Storage { .. } | AppError::Config(_) | AppError::Internal(_) => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MalformedMultipart(_) => "Invalid multipart form data".to_string(),
            AppError::MissingFilePart => "No file provided".to_string(),
            AppError::EmptyFilename => "No file selected".to_string(),
            AppError::NoExtension(_) => "Filename has no extension".to_string(),
            AppError::ExtensionNotAllowed { allowed, .. } => {
                format!("File type not allowed. Allowed types: {}", allowed.join(", "))
            }
            AppError::TooLarge { max, .. } => {
                format!("File too large. Max size is {} MB", max / 1024 / 1024)
            }
            AppError::UnsafeFilename(_) => "Filename is not usable".to_string(),
            // Internal failures stay generic towards the client.
            AppError::Storage { .. } => "Failed to store file".to_string(),
            AppError::Config(_) => "Server storage is not configured".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Storage { code, .. } => Some(code.clone()),
            _ => None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::MalformedMultipart(_)
            | AppError::MissingFilePart
            | AppError::EmptyFilename
            | AppError::NoExtension(_)
            | AppError::ExtensionNotAllowed { .. }
            | AppError::TooLarge { .. }
            | AppError::UnsafeFilename(_) => LogLevel::Debug,
            AppError::Storage { .. } | AppError::Config(_) | AppError::Internal(_) => {
                LogLevel::Error
            }
        }
    }
}
