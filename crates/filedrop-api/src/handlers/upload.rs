use crate::error::HttpAppError;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection,
        Multipart, State,
    },
    Json,
};
use filedrop_core::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    /// The storage key the object landed under (not the declared filename).
    pub filename: String,
    pub size: u64,
}

/// POST /upload - accept one multipart part named "file" and store it.
///
/// The extractor rejection is taken by value so a missing/broken multipart
/// content type still renders through our error shape instead of axum's.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart =
        multipart.map_err(|r| HttpAppError(AppError::MalformedMultipart(r.body_text())))?;

    let service = UploadService::new(&state);
    let data = service.upload(multipart).await?;

    Ok(Json(UploadResponse {
        success: true,
        url: data.url,
        filename: data.key,
        size: data.size,
    }))
}
