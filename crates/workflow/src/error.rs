//! Workflow error taxonomy.

use domain::DomainError;
use repository::RepositoryError;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the fulfillment workflow.
///
/// Validation, authorization, and precondition errors are raised before any
/// external effect and carry no compensation burden. Upload and persistence
/// errors occurring after earlier writes are raised only after the
/// documented compensations have run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Bad or missing caller input.
    #[error("validation failed: {0}")]
    Validation(#[from] DomainError),

    /// The caller lacks the operator role.
    #[error("operator role required for {operation}")]
    Authorization { operation: &'static str },

    /// The entity exists but is in the wrong state for the operation.
    #[error("precondition '{check}' failed: {detail}")]
    Precondition { check: &'static str, detail: String },

    /// An object-store write or delete failed.
    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    /// A relational-store read or write failed.
    #[error("persistence failed: {0}")]
    Persistence(RepositoryError),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl From<RepositoryError> for WorkflowError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => WorkflowError::NotFound { entity, id },
            other => WorkflowError::Persistence(other),
        }
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: WorkflowError = RepositoryError::not_found("order", "abc").into();
        assert!(matches!(err, WorkflowError::NotFound { entity: "order", .. }));
    }

    #[test]
    fn test_other_repository_errors_map_to_persistence() {
        let err: WorkflowError = RepositoryError::Backend("down".to_string()).into();
        assert!(matches!(err, WorkflowError::Persistence(_)));
    }

    #[test]
    fn test_storage_errors_map_to_upload() {
        let err: WorkflowError = StorageError::AlreadyExists("p".to_string()).into();
        assert!(matches!(err, WorkflowError::Upload(_)));
    }
}
