//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repository::RepositoryError;
use storage::StorageError;
use workflow::WorkflowError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (bad ids, missing headers, broken multipart).
    BadRequest(String),
    /// Resource not found at the API layer.
    NotFound(String),
    /// Workflow error carrying its own taxonomy.
    Workflow(WorkflowError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Workflow(err) => workflow_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn workflow_error_to_response(err: WorkflowError) -> (StatusCode, String) {
    match &err {
        WorkflowError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        WorkflowError::Authorization { .. } => (StatusCode::FORBIDDEN, err.to_string()),
        WorkflowError::Precondition { .. } => (StatusCode::CONFLICT, err.to_string()),
        WorkflowError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        WorkflowError::Upload(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        WorkflowError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Workflow(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Workflow(WorkflowError::Upload(err))
    }
}
