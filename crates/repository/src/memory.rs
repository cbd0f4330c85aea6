//! In-memory store implementations for testing.
//!
//! Each store mirrors its PostgreSQL twin's contract, including
//! last-writer-wins row updates, and adds failure injection so saga
//! compensation paths can be exercised deterministically.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CategoryId, OrderId, ProductId, RequesterId};
use domain::{Category, Order, Product, Requester};

use crate::category::CategoryRepository;
use crate::error::{RepositoryError, Result};
use crate::order::{OrderRepository, OrderUpdate, StatusFilter};
use crate::product::{ProductRepository, ProductUpdate};
use crate::requester::RequesterRepository;

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    fail_on_insert: bool,
    fail_on_update: bool,
}

/// In-memory order store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures inserts to fail.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert = fail;
    }

    /// Configures updates to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_insert {
            return Err(RepositoryError::Backend(
                "injected insert failure".to_string(),
            ));
        }
        state.orders.insert(order.id, order);
        Ok(())
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().unwrap().orders.get(&id).cloned())
    }

    async fn update_by_id(&self, id: OrderId, update: OrderUpdate) -> Result<Order> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_update {
            return Err(RepositoryError::Backend(
                "injected update failure".to_string(),
            ));
        }

        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("order", id))?;

        if let Some(status) = update.status {
            order.status = status;
        }
        if let Some(price) = update.quoted_price {
            order.quoted_price = Some(price);
        }
        if let Some(paths) = update.completed_image_paths {
            order.completed_image_paths = paths;
        }
        if let Some(product_id) = update.linked_product_id {
            order.linked_product_id = Some(product_id);
        }

        Ok(order.clone())
    }

    async fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Order>> {
        let state = self.state.read().unwrap();
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| filter.matches(o.status))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_by_requester(
        &self,
        requester_id: &RequesterId,
        filter: StatusFilter,
    ) -> Result<Vec<Order>> {
        let state = self.state.read().unwrap();
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| &o.requester_id == requester_id && filter.matches(o.status))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: HashMap<ProductId, Product>,
    fail_on_insert: bool,
    fail_on_update: bool,
}

/// In-memory product store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures inserts to fail.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert = fail;
    }

    /// Configures updates to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Returns the number of stored products.
    pub fn product_count(&self) -> usize {
        self.state.read().unwrap().products.len()
    }

    /// Returns true if a product exists with the given id.
    pub fn has_product(&self, id: ProductId) -> bool {
        self.state.read().unwrap().products.contains_key(&id)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_insert {
            return Err(RepositoryError::Backend(
                "injected insert failure".to_string(),
            ));
        }
        state.products.insert(product.id, product);
        Ok(())
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.read().unwrap().products.get(&id).cloned())
    }

    async fn update_by_id(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_update {
            return Err(RepositoryError::Backend(
                "injected update failure".to_string(),
            ));
        }

        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("product", id))?;

        if let Some(paths) = update.image_paths {
            product.image_paths = paths;
        }
        if let Some(is_active) = update.is_active {
            product.is_active = is_active;
        }
        if let Some(quantity) = update.stock_quantity {
            product.stock_quantity = quantity;
        }

        Ok(product.clone())
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<()> {
        self.state.write().unwrap().products.remove(&id);
        Ok(())
    }

    async fn list_active(&self, limit: i64) -> Result<Vec<Product>> {
        let state = self.state.read().unwrap();
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(limit.max(0) as usize);
        Ok(products)
    }

    async fn list_by_category(&self, category_id: CategoryId, limit: i64) -> Result<Vec<Product>> {
        let state = self.state.read().unwrap();
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_active && p.category_id == category_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(limit.max(0) as usize);
        Ok(products)
    }
}

#[derive(Debug, Default)]
struct InMemoryCategoryState {
    categories: HashMap<CategoryId, Category>,
}

/// In-memory category store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    state: Arc<RwLock<InMemoryCategoryState>>,
}

impl InMemoryCategoryRepository {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, category: Category) -> Result<()> {
        self.state
            .write()
            .unwrap()
            .categories
            .insert(category.id, category);
        Ok(())
    }

    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.state.read().unwrap().categories.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let state = self.state.read().unwrap();
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| c.id.as_i32());
        Ok(categories)
    }
}

#[derive(Debug, Default)]
struct InMemoryRequesterState {
    requesters: HashMap<RequesterId, Requester>,
    fail_on_upsert: bool,
}

/// In-memory requester store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRequesterRepository {
    state: Arc<RwLock<InMemoryRequesterState>>,
}

impl InMemoryRequesterRepository {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures upserts to fail.
    pub fn set_fail_on_upsert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_upsert = fail;
    }

    /// Returns the number of stored requesters.
    pub fn requester_count(&self) -> usize {
        self.state.read().unwrap().requesters.len()
    }
}

#[async_trait]
impl RequesterRepository for InMemoryRequesterRepository {
    async fn upsert(&self, id: &RequesterId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_upsert {
            return Err(RepositoryError::Backend(
                "injected upsert failure".to_string(),
            ));
        }
        state
            .requesters
            .entry(id.clone())
            .or_insert_with(|| Requester::new(id.clone()));
        Ok(())
    }

    async fn exists(&self, id: &RequesterId) -> Result<bool> {
        Ok(self.state.read().unwrap().requesters.contains_key(id))
    }
}
