//! HTTP error response conversion
//!
//! The HTTP adapter is the only place that turns `AppError` values into
//! status codes and JSON bodies. Handlers return
//! `Result<impl IntoResponse, HttpAppError>` and use `?`; logging happens
//! here, once, at the level the error's metadata asks for.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

/// JSON error body. `success` is always false; `reason` is the machine code
/// for client input errors; `details` carries the provider error code for
/// storage failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in filedrop-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            success: false,
            error: app_error.client_message(),
            reason: app_error.reason().map(String::from),
            details: app_error.details(),
        });

        (status, body).into_response()
    }
}
