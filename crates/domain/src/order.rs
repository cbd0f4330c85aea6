//! Custom-fabrication order record.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, RequesterId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::OrderStatus;

/// Minimum description length, counted in characters after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// A custom-fabrication order as persisted in the relational store.
///
/// `source_image_path` and `reference_image_paths` are set once at creation
/// and never mutated. `linked_product_id` is set at most once; once present
/// it marks the order as already published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub requester_id: RequesterId,
    pub description: String,
    pub size_preference: String,
    pub source_image_path: String,
    pub reference_image_paths: Vec<String>,
    pub status: OrderStatus,
    pub quoted_price: Option<Money>,
    /// Non-empty only once the completion operation has run (1–5 paths).
    pub completed_image_paths: Vec<String>,
    pub linked_product_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a freshly submitted order in `pending_review`.
    pub fn new(
        requester_id: RequesterId,
        description: impl Into<String>,
        size_preference: impl Into<String>,
        source_image_path: impl Into<String>,
        reference_image_paths: Vec<String>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            requester_id,
            description: description.into(),
            size_preference: size_preference.into(),
            source_image_path: source_image_path.into(),
            reference_image_paths,
            status: OrderStatus::PendingReview,
            quoted_price: None,
            completed_image_paths: Vec::new(),
            linked_product_id: None,
            created_at: Utc::now(),
        }
    }

    /// Returns true once publication has recorded a catalog product.
    pub fn is_published(&self) -> bool {
        self.linked_product_id.is_some()
    }
}
