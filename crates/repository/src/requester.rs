//! Requester store trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::RequesterId;

use crate::Result;

/// Store for requester rows mirrored from the auth boundary.
#[async_trait]
pub trait RequesterRepository: Send + Sync {
    /// Ensures a row exists for the requester. Idempotent: upserting an
    /// existing id succeeds without modifying the row.
    async fn upsert(&self, id: &RequesterId) -> Result<()>;

    /// Returns true if a row exists for the requester.
    async fn exists(&self, id: &RequesterId) -> Result<bool>;
}

#[async_trait]
impl<T> RequesterRepository for Arc<T>
where
    T: RequesterRepository + ?Sized,
{
    async fn upsert(&self, id: &RequesterId) -> Result<()> {
        (**self).upsert(id).await
    }

    async fn exists(&self, id: &RequesterId) -> Result<bool> {
        (**self).exists(id).await
    }
}
