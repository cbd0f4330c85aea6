//! Category store trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::CategoryId;
use domain::Category;

use crate::Result;

/// Store for catalog category rows.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Inserts a new category row.
    async fn insert(&self, category: Category) -> Result<()>;

    /// Loads a category by id.
    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Lists all categories ordered by id.
    async fn list_all(&self) -> Result<Vec<Category>>;
}

#[async_trait]
impl<T> CategoryRepository for Arc<T>
where
    T: CategoryRepository + ?Sized,
{
    async fn insert(&self, category: Category) -> Result<()> {
        (**self).insert(category).await
    }

    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        (**self).get_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        (**self).list_all().await
    }
}
