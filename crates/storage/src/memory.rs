//! In-memory storage gateway for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::gateway::StorageGateway;

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct InMemoryStorageState {
    objects: HashMap<String, StoredObject>,
    signed_urls: HashMap<String, (String, DateTime<Utc>)>,
    fail_on_put: bool,
    fail_put_when_path_contains: Option<String>,
    fail_on_delete: bool,
}

/// In-memory storage gateway for testing.
///
/// Supports targeted failure injection so saga compensation paths can be
/// exercised deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorageGateway {
    state: Arc<RwLock<InMemoryStorageState>>,
}

impl InMemoryStorageGateway {
    /// Creates a new empty in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every put to fail.
    pub fn set_fail_on_put(&self, fail: bool) {
        self.state.write().unwrap().fail_on_put = fail;
    }

    /// Configures puts to fail when the target path contains `fragment`.
    pub fn set_fail_on_put_matching(&self, fragment: impl Into<String>) {
        self.state.write().unwrap().fail_put_when_path_contains = Some(fragment.into());
    }

    /// Clears any put failure injection.
    pub fn clear_put_failures(&self) {
        let mut state = self.state.write().unwrap();
        state.fail_on_put = false;
        state.fail_put_when_path_contains = None;
    }

    /// Configures every delete to fail.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().unwrap().fail_on_delete = fail;
    }

    /// Returns the total number of stored objects.
    pub fn object_count(&self) -> usize {
        self.state.read().unwrap().objects.len()
    }

    /// Returns true if an object exists at the given path.
    pub fn has_object(&self, path: &str) -> bool {
        self.state.read().unwrap().objects.contains_key(path)
    }

    /// Returns the number of objects whose path starts with `prefix`.
    pub fn count_under(&self, prefix: &str) -> usize {
        self.state
            .read()
            .unwrap()
            .objects
            .keys()
            .filter(|path| path.starts_with(prefix))
            .count()
    }

    /// Returns the stored content type for a path, if present.
    pub fn content_type_of(&self, path: &str) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .objects
            .get(path)
            .map(|o| o.content_type.clone())
    }

    /// Returns the path a previously issued signed URL token resolves to,
    /// if the token is still valid.
    pub fn resolve_signed_token(&self, token: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        state
            .signed_urls
            .get(token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(path, _)| path.clone())
    }
}

#[async_trait]
impl StorageGateway for InMemoryStorageGateway {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_put {
            return Err(StorageError::Backend("injected put failure".to_string()));
        }
        if let Some(fragment) = &state.fail_put_when_path_contains
            && path.contains(fragment.as_str())
        {
            return Err(StorageError::Backend(format!(
                "injected put failure for '{path}'"
            )));
        }

        if !overwrite && state.objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        state.objects.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String> {
        let mut state = self.state.write().unwrap();

        if !state.objects.contains_key(path) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(0));
        state
            .signed_urls
            .insert(token.clone(), (path.to_string(), expires_at));

        Ok(format!("memory://signed/{token}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_delete {
            return Err(StorageError::Backend("injected delete failure".to_string()));
        }

        state.objects.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete() {
        let gateway = InMemoryStorageGateway::new();

        gateway
            .put("u/source/a.png", vec![1, 2, 3], "image/png", false)
            .await
            .unwrap();
        assert!(gateway.has_object("u/source/a.png"));
        assert_eq!(
            gateway.content_type_of("u/source/a.png").unwrap(),
            "image/png"
        );

        gateway.delete("u/source/a.png").await.unwrap();
        assert_eq!(gateway.object_count(), 0);
    }

    #[tokio::test]
    async fn test_non_overwrite_put_rejects_existing_path() {
        let gateway = InMemoryStorageGateway::new();
        gateway
            .put("u/source/a.png", vec![1], "image/png", false)
            .await
            .unwrap();

        let err = gateway
            .put("u/source/a.png", vec![2], "image/png", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_overwrite_put_replaces_existing_object() {
        let gateway = InMemoryStorageGateway::new();
        gateway
            .put("p/images/0_a.png", vec![1], "image/png", true)
            .await
            .unwrap();
        gateway
            .put("p/images/0_a.png", vec![2], "image/jpeg", true)
            .await
            .unwrap();

        assert_eq!(gateway.object_count(), 1);
        assert_eq!(
            gateway.content_type_of("p/images/0_a.png").unwrap(),
            "image/jpeg"
        );
    }

    #[tokio::test]
    async fn test_delete_of_absent_path_is_idempotent() {
        let gateway = InMemoryStorageGateway::new();
        assert!(gateway.delete("nowhere.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_signed_url_requires_existing_object() {
        let gateway = InMemoryStorageGateway::new();
        let err = gateway
            .signed_read_url("missing.png", Duration::from_secs(600))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_signed_url_token_resolves_to_path() {
        let gateway = InMemoryStorageGateway::new();
        gateway
            .put("u/source/a.png", vec![1], "image/png", false)
            .await
            .unwrap();

        let url = gateway
            .signed_read_url("u/source/a.png", Duration::from_secs(600))
            .await
            .unwrap();
        let token = url.strip_prefix("memory://signed/").unwrap();
        assert_eq!(
            gateway.resolve_signed_token(token).unwrap(),
            "u/source/a.png"
        );
    }

    #[tokio::test]
    async fn test_targeted_put_failure_injection() {
        let gateway = InMemoryStorageGateway::new();
        gateway.set_fail_on_put_matching("refs/1_");

        gateway
            .put("u/refs/0_a.png", vec![1], "image/png", false)
            .await
            .unwrap();
        let err = gateway
            .put("u/refs/1_b.png", vec![1], "image/png", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));

        gateway.clear_put_failures();
        gateway
            .put("u/refs/1_b.png", vec![1], "image/png", false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_count_under_prefix() {
        let gateway = InMemoryStorageGateway::new();
        gateway
            .put("u/scope-a/source/a.png", vec![1], "image/png", false)
            .await
            .unwrap();
        gateway
            .put("u/scope-a/refs/0_b.png", vec![1], "image/png", false)
            .await
            .unwrap();
        gateway
            .put("u/scope-b/source/c.png", vec![1], "image/png", false)
            .await
            .unwrap();

        assert_eq!(gateway.count_under("u/scope-a/"), 2);
        assert_eq!(gateway.count_under("u/scope-b/"), 1);
    }
}
