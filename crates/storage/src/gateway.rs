//! Storage gateway trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Core trait for object storage implementations.
///
/// Paths are caller-chosen strings; the gateway enforces no structure beyond
/// uniqueness-on-non-overwrite. All implementations must be thread-safe.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Writes an object at `path`.
    ///
    /// With `overwrite` false the put fails with [`StorageError::AlreadyExists`]
    /// if the path already holds an object; with `overwrite` true an existing
    /// object is replaced.
    ///
    /// [`StorageError::AlreadyExists`]: crate::StorageError::AlreadyExists
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()>;

    /// Issues a time-limited capability URL granting read access to one path.
    ///
    /// Fails with [`StorageError::NotFound`] if no object exists at the path.
    ///
    /// [`StorageError::NotFound`]: crate::StorageError::NotFound
    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String>;

    /// Deletes the object at `path`. Used only for compensation; deleting an
    /// absent path succeeds so compensations stay idempotent.
    async fn delete(&self, path: &str) -> Result<()>;
}

#[async_trait]
impl<T> StorageGateway for Arc<T>
where
    T: StorageGateway + ?Sized,
{
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()> {
        (**self).put(path, bytes, content_type, overwrite).await
    }

    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String> {
        (**self).signed_read_url(path, ttl).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        (**self).delete(path).await
    }
}
