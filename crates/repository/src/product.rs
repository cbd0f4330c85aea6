//! Product store trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CategoryId, ProductId};
use domain::Product;

use crate::Result;

/// Field-level partial update of a product row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub image_paths: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub stock_quantity: Option<u32>,
}

/// Store for catalog product rows.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a new product row.
    async fn insert(&self, product: Product) -> Result<()>;

    /// Loads a product by id.
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Applies a partial update to one row, atomically, and returns the
    /// updated row. Fails with `NotFound` if the row does not exist.
    async fn update_by_id(&self, id: ProductId, update: ProductUpdate) -> Result<Product>;

    /// Deletes a product row. Used by publication compensation; deleting an
    /// absent row succeeds.
    async fn delete_by_id(&self, id: ProductId) -> Result<()>;

    /// Lists the newest active products, up to `limit`.
    async fn list_active(&self, limit: i64) -> Result<Vec<Product>>;

    /// Lists the newest active products in one category, up to `limit`.
    async fn list_by_category(&self, category_id: CategoryId, limit: i64) -> Result<Vec<Product>>;
}

#[async_trait]
impl<T> ProductRepository for Arc<T>
where
    T: ProductRepository + ?Sized,
{
    async fn insert(&self, product: Product) -> Result<()> {
        (**self).insert(product).await
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        (**self).get_by_id(id).await
    }

    async fn update_by_id(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        (**self).update_by_id(id, update).await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<()> {
        (**self).delete_by_id(id).await
    }

    async fn list_active(&self, limit: i64) -> Result<Vec<Product>> {
        (**self).list_active(limit).await
    }

    async fn list_by_category(&self, category_id: CategoryId, limit: i64) -> Result<Vec<Product>> {
        (**self).list_by_category(category_id, limit).await
    }
}
