//! Order store trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, ProductId, RequesterId};
use domain::{Money, Order, OrderStatus};

use crate::Result;

/// Filter for listing orders by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// All statuses.
    All,
    /// Exactly one status.
    Only(OrderStatus),
}

impl StatusFilter {
    /// Returns true if an order with `status` passes the filter.
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

/// Field-level partial update of an order row.
///
/// `None` leaves the column unchanged. The whole update is applied
/// atomically to the row or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub quoted_price: Option<Money>,
    pub completed_image_paths: Option<Vec<String>>,
    pub linked_product_id: Option<ProductId>,
}

/// Store for custom-fabrication order rows.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order row.
    async fn insert(&self, order: Order) -> Result<()>;

    /// Loads an order by id.
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Applies a partial update to one row, atomically, and returns the
    /// updated row. Fails with `NotFound` if the row does not exist.
    async fn update_by_id(&self, id: OrderId, update: OrderUpdate) -> Result<Order>;

    /// Lists orders matching the filter, newest first.
    async fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Order>>;

    /// Lists one requester's orders matching the filter, newest first.
    async fn list_by_requester(
        &self,
        requester_id: &RequesterId,
        filter: StatusFilter,
    ) -> Result<Vec<Order>>;
}

#[async_trait]
impl<T> OrderRepository for Arc<T>
where
    T: OrderRepository + ?Sized,
{
    async fn insert(&self, order: Order) -> Result<()> {
        (**self).insert(order).await
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        (**self).get_by_id(id).await
    }

    async fn update_by_id(&self, id: OrderId, update: OrderUpdate) -> Result<Order> {
        (**self).update_by_id(id, update).await
    }

    async fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Order>> {
        (**self).list_by_status(filter).await
    }

    async fn list_by_requester(
        &self,
        requester_id: &RequesterId,
        filter: StatusFilter,
    ) -> Result<Vec<Order>> {
        (**self).list_by_requester(requester_id, filter).await
    }
}
