//! Requester record.

use chrono::{DateTime, Utc};
use common::RequesterId;
use serde::{Deserialize, Serialize};

/// A known requester, mirrored from the auth boundary.
///
/// Rows exist to satisfy the order foreign-key invariant; the intake saga
/// upserts one before inserting an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requester {
    pub id: RequesterId,
    pub created_at: DateTime<Utc>,
}

impl Requester {
    /// Creates a requester row.
    pub fn new(id: RequesterId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
        }
    }
}
