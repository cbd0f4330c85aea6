//! HTTP route handlers.

pub mod admin;
pub mod catalog;
pub mod health;
pub mod metrics;
pub mod orders;

use axum::extract::multipart::Field;
use axum::http::HeaderMap;
use domain::ImageFile;
use workflow::Caller;

use crate::error::ApiError;

/// Resolves the caller identity handed in by the auth boundary.
///
/// The boundary terminates authentication upstream and forwards the subject
/// and role as headers; the core only ever sees this pair.
pub(crate) fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, ApiError> {
    let id = headers
        .get("x-caller-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing x-caller-id header".to_string()))?;

    let is_operator = headers
        .get("x-caller-role")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role == "operator");

    Ok(if is_operator {
        Caller::operator(id)
    } else {
        Caller::requester(id)
    })
}

/// Reads one multipart file field into an [`ImageFile`].
pub(crate) async fn image_from_field(field: Field<'_>) -> Result<ImageFile, ApiError> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

    Ok(ImageFile::new(filename, content_type, bytes.to_vec()))
}

/// Reads one multipart text field.
pub(crate) async fn text_from_field(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read field: {e}")))
}
