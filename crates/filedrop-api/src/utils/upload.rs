//! Multipart extraction for file upload handlers

use axum::extract::Multipart;
use bytes::Bytes;
use filedrop_core::AppError;

/// One file pulled out of a multipart body, buffered so its size is known
/// before any policy check runs.
#[derive(Debug)]
pub struct ExtractedFile {
    pub data: Bytes,
    pub original_filename: String,
    pub content_type: Option<String>,
}

/// Extract the single part named "file" from a multipart form.
///
/// Other parts are skipped without error; a second part named "file" is
/// rejected. A part with a filename but zero bytes is a valid file of
/// length 0 and passes through.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<ExtractedFile, AppError> {
    let mut extracted: Option<ExtractedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedMultipart(e.to_string()))?
    {
        if field.name().unwrap_or_default() != "file" {
            continue;
        }
        if extracted.is_some() {
            return Err(AppError::MalformedMultipart(
                "more than one part named 'file'".to_string(),
            ));
        }

        let original_filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or(AppError::EmptyFilename)?;
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::MalformedMultipart(e.to_string()))?;

        extracted = Some(ExtractedFile {
            data,
            original_filename,
            content_type,
        });
    }

    extracted.ok_or(AppError::MissingFilePart)
}
