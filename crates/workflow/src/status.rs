//! Operator actions on the order status field.

use std::sync::Arc;

use common::OrderId;
use domain::{DomainError, ImageFile, MAX_ORDER_IMAGES, Money, Order, OrderStatus};
use repository::{OrderRepository, OrderUpdate};
use storage::StorageGateway;

use crate::auth::Caller;
use crate::compensation::CompensationStack;
use crate::error::{Result, WorkflowError};

/// Optional guard consulted by [`OrderStatusWorkflow::set_status`].
///
/// Receives `(current, requested)` and returns whether the transition is
/// allowed. No hook is installed by default: the status field is an
/// unconstrained label, and the workflow enforces no transition graph.
pub type TransitionHook = Arc<dyn Fn(OrderStatus, OrderStatus) -> bool + Send + Sync>;

/// Standalone operator actions: quote, status change, completion.
pub struct OrderStatusWorkflow<G, O>
where
    G: StorageGateway,
    O: OrderRepository,
{
    gateway: G,
    orders: O,
    transition_hook: Option<TransitionHook>,
}

impl<G, O> OrderStatusWorkflow<G, O>
where
    G: StorageGateway + Clone + 'static,
    O: OrderRepository,
{
    /// Creates a workflow with no transition hook (fully permissive).
    pub fn new(gateway: G, orders: O) -> Self {
        Self {
            gateway,
            orders,
            transition_hook: None,
        }
    }

    /// Installs a transition hook consulted by `set_status`.
    pub fn with_transition_hook(mut self, hook: TransitionHook) -> Self {
        self.transition_hook = Some(hook);
        self
    }

    /// Records a quote and moves the order to `quote_provided`.
    ///
    /// No precondition on the current status: any order may be quoted.
    #[tracing::instrument(skip(self, caller))]
    pub async fn provide_quote(
        &self,
        caller: &Caller,
        order_id: OrderId,
        price: Money,
    ) -> Result<Order> {
        caller.require_operator("provide_quote")?;
        if !price.is_positive() {
            return Err(DomainError::QuoteNotPositive.into());
        }

        let order = self
            .orders
            .update_by_id(order_id, OrderUpdate {
                quoted_price: Some(price),
                status: Some(OrderStatus::QuoteProvided),
                ..OrderUpdate::default()
            })
            .await?;

        metrics::counter!("quotes_provided_total").increment(1);
        tracing::info!(price = %price, "quote provided");
        Ok(order)
    }

    /// Sets the order status to any member of the enumeration.
    ///
    /// With no hook installed the current status is not even read; the
    /// update goes straight to the store.
    #[tracing::instrument(skip(self, caller))]
    pub async fn set_status(
        &self,
        caller: &Caller,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order> {
        caller.require_operator("set_status")?;

        if let Some(hook) = &self.transition_hook {
            let order = self
                .orders
                .get_by_id(order_id)
                .await?
                .ok_or_else(|| WorkflowError::NotFound {
                    entity: "order",
                    id: order_id.to_string(),
                })?;
            if !hook(order.status, new_status) {
                return Err(WorkflowError::Precondition {
                    check: "transition_allowed",
                    detail: format!("{} -> {new_status} rejected by transition hook", order.status),
                });
            }
        }

        let order = self
            .orders
            .update_by_id(order_id, OrderUpdate {
                status: Some(new_status),
                ..OrderUpdate::default()
            })
            .await?;

        metrics::counter!("status_updates_total").increment(1);
        tracing::info!("status updated");
        Ok(order)
    }

    /// Uploads 1–5 completed images and unconditionally moves the order to
    /// `completed`, whatever its prior status.
    ///
    /// Image constraints are validated before any upload. Overwrite is
    /// allowed on completion paths, so a re-run replaces earlier images. A
    /// failure mid-sequence, or on the final row update, deletes the objects
    /// this invocation uploaded before surfacing the error.
    #[tracing::instrument(skip(self, caller, images))]
    pub async fn complete_with_images(
        &self,
        caller: &Caller,
        order_id: OrderId,
        images: Vec<ImageFile>,
    ) -> Result<Order> {
        caller.require_operator("complete_with_images")?;
        domain::validate_image_batch(&images, "completed image", 1, MAX_ORDER_IMAGES)?;

        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            })?;

        let mut compensations = CompensationStack::new();
        let mut uploaded = Vec::with_capacity(images.len());
        for (i, image) in images.into_iter().enumerate() {
            let path = format!(
                "{}/custom-orders/{order_id}/completed/{i}_{}",
                order.requester_id, image.filename
            );
            tracing::debug!(path = %path, "uploading completed image");
            match self
                .gateway
                .put(&path, image.bytes, &image.content_type, true)
                .await
            {
                Ok(()) => {
                    let gateway = self.gateway.clone();
                    let delete_path = path.clone();
                    compensations.push(format!("delete object {path}"), Box::pin(async move {
                        gateway.delete(&delete_path).await?;
                        Ok(())
                    }));
                    uploaded.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "completed image upload failed, deleting prior uploads");
                    compensations.unwind().await;
                    return Err(e.into());
                }
            }
        }

        match self
            .orders
            .update_by_id(order_id, OrderUpdate {
                completed_image_paths: Some(uploaded),
                status: Some(OrderStatus::Completed),
                ..OrderUpdate::default()
            })
            .await
        {
            Ok(order) => {
                compensations.disarm();
                metrics::counter!("completions_total").increment(1);
                tracing::info!("order completed");
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "completion update failed, deleting uploads");
                compensations.unwind().await;
                Err(e.into())
            }
        }
    }
}
