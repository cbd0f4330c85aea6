//! Caller identity from the external auth boundary.

use common::RequesterId;

use crate::error::{Result, WorkflowError};

/// The identity and role attached to every workflow invocation.
///
/// The core never authenticates: the auth boundary resolves the session and
/// hands in this pair. Operator-only operations check `is_operator`;
/// requester-bound operations trust `id` as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: RequesterId,
    pub is_operator: bool,
}

impl Caller {
    /// A plain requester caller.
    pub fn requester(id: impl Into<RequesterId>) -> Self {
        Self {
            id: id.into(),
            is_operator: false,
        }
    }

    /// An operator caller.
    pub fn operator(id: impl Into<RequesterId>) -> Self {
        Self {
            id: id.into(),
            is_operator: true,
        }
    }

    /// Fails with an authorization error unless the caller is an operator.
    pub fn require_operator(&self, operation: &'static str) -> Result<()> {
        if self.is_operator {
            Ok(())
        } else {
            Err(WorkflowError::Authorization { operation })
        }
    }
}
