//! Order status label.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The status of a custom-fabrication order.
///
/// Deliberately an unconstrained label rather than a guarded state machine:
/// no transition graph is enforced anywhere in the core, and any status may
/// move to any other status. `Cancelled` is terminal in practice only —
/// nothing in the workflow transitions out of it, but nothing forbids it
/// either. Callers wanting stricter semantics install a transition hook on
/// the status workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, awaiting operator review.
    #[default]
    PendingReview,

    /// Operator has provided a quote.
    QuoteProvided,

    /// Awaiting payment (placeholder; payment itself is out of scope).
    PaymentPending,

    /// Fabrication underway.
    InProgress,

    /// Fabrication finished, completed images uploaded.
    Completed,

    /// Shipped to the requester.
    Shipped,

    /// Delivered to the requester.
    Delivered,

    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    /// All members of the enumeration, in lifecycle order.
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::PendingReview,
        OrderStatus::QuoteProvided,
        OrderStatus::PaymentPending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Returns the snake_case wire/database form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingReview => "pending_review",
            OrderStatus::QuoteProvided => "quote_provided",
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true once the completion operation has run.
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Returns true while the requester may still withdraw the order
    /// themselves (before payment or fabrication has started).
    ///
    /// Advisory only — `set_status` does not consult it.
    pub fn can_requester_cancel(&self) -> bool {
        matches!(self, OrderStatus::PendingReview | OrderStatus::QuoteProvided)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_review" => Ok(OrderStatus::PendingReview),
            "quote_provided" => Ok(OrderStatus::QuoteProvided),
            "payment_pending" => Ok(OrderStatus::PaymentPending),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
