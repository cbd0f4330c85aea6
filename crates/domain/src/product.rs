//! Catalog product record.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A resellable catalog product.
///
/// Created by the publication saga with an empty image list; the list is
/// backfilled in a later saga step, so a row is briefly "created but
/// imageless" by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Stored derived field: `base_price + painting_price`.
    pub price: Money,
    pub base_price: Money,
    pub painting_price: Money,
    pub stock_quantity: u32,
    pub category_id: CategoryId,
    pub image_paths: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates an active product with no images and the stored price
    /// computed from its parts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        base_price: Money,
        painting_price: Money,
        stock_quantity: u32,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: description.into(),
            price: base_price + painting_price,
            base_price,
            painting_price,
            stock_quantity,
            category_id,
            image_paths: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
