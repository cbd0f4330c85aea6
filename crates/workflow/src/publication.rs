//! Publication saga: converts a completed order into a catalog product.

use common::{CategoryId, OrderId, ProductId};
use domain::{DomainError, ImageFile, MAX_ORDER_IMAGES, Money, OrderStatus, Product};
use repository::{CategoryRepository, OrderRepository, OrderUpdate, ProductRepository, ProductUpdate};
use storage::StorageGateway;

use crate::auth::Caller;
use crate::compensation::CompensationStack;
use crate::error::{Result, WorkflowError};

/// Product fields supplied by the operator at publication time.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub painting_price: Money,
    pub stock_quantity: u32,
    pub category_id: CategoryId,
}

/// Outcome of a successful publication.
///
/// `link_warning` is the designed succeeded-with-warning variant: when the
/// final order cross-link cannot be recorded, the product is still durably
/// published and the warning rides along instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub product_id: ProductId,
    pub link_warning: Option<String>,
}

/// Orchestrates publication of a completed order as a catalog product.
///
/// Compensation policy, step by step:
/// 1. product insert — nothing to compensate;
/// 2. image uploads — any failure deletes the product row from step 1 but
///    leaves images already uploaded in this step behind (accepted leak);
/// 3. image-list backfill — past the pivot, no rollback: a half-linked
///    product beats losing uploaded assets;
/// 4. order cross-link — best effort, failure demoted to a warning.
pub struct PublicationSaga<G, O, P, C>
where
    G: StorageGateway,
    O: OrderRepository,
    P: ProductRepository,
    C: CategoryRepository,
{
    gateway: G,
    orders: O,
    products: P,
    categories: C,
}

impl<G, O, P, C> PublicationSaga<G, O, P, C>
where
    G: StorageGateway + Clone + 'static,
    O: OrderRepository,
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository,
{
    /// Creates a new publication saga.
    pub fn new(gateway: G, orders: O, products: P, categories: C) -> Self {
        Self {
            gateway,
            orders,
            products,
            categories,
        }
    }

    /// Publishes a completed order as a catalog product.
    #[tracing::instrument(skip(self, caller, draft, images))]
    pub async fn publish(
        &self,
        caller: &Caller,
        order_id: OrderId,
        draft: ProductDraft,
        images: Vec<ImageFile>,
    ) -> Result<Published> {
        caller.require_operator("publish")?;
        metrics::counter!("publication_attempts_total").increment(1);
        let saga_start = std::time::Instant::now();

        // Preconditions, checked before any effect.
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            })?;
        if order.status != OrderStatus::Completed {
            return Err(WorkflowError::Precondition {
                check: "order_completed",
                detail: format!("order is {}, publication requires completed", order.status),
            });
        }
        if let Some(existing) = order.linked_product_id {
            return Err(WorkflowError::Precondition {
                check: "not_already_published",
                detail: format!("order already linked to product {existing}"),
            });
        }

        // Validation, still effect-free.
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::ProductNameRequired.into());
        }
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(DomainError::ProductDescriptionRequired.into());
        }
        if !draft.base_price.is_positive() {
            return Err(DomainError::BasePriceNotPositive.into());
        }
        if draft.painting_price.is_negative() {
            return Err(DomainError::PaintingPriceNegative.into());
        }
        domain::validate_image_batch(&images, "product image", 1, MAX_ORDER_IMAGES)?;
        if self.categories.get_by_id(draft.category_id).await?.is_none() {
            return Err(DomainError::UnknownCategory(draft.category_id).into());
        }

        // Step 1: create the product, imageless.
        let product = Product::new(
            name,
            description,
            draft.base_price,
            draft.painting_price,
            draft.stock_quantity,
            draft.category_id,
        );
        let product_id = product.id;
        self.products.insert(product).await.map_err(|e| {
            metrics::counter!("publication_failed").increment(1);
            WorkflowError::from(e)
        })?;

        let mut compensations = CompensationStack::new();
        {
            let products = self.products.clone();
            compensations.push(format!("delete product {product_id}"), Box::pin(async move {
                products.delete_by_id(product_id).await?;
                Ok(())
            }));
        }

        // Step 2: upload images. A failure rolls back the product row only;
        // images already written in this step stay behind.
        let mut uploaded = Vec::with_capacity(images.len());
        for (i, image) in images.into_iter().enumerate() {
            let path = format!("products/{product_id}/images/{i}_{}", image.filename);
            tracing::debug!(path = %path, "uploading product image");
            match self
                .gateway
                .put(&path, image.bytes, &image.content_type, true)
                .await
            {
                Ok(()) => uploaded.push(path),
                Err(e) => {
                    tracing::warn!(
                        path = %path,
                        orphaned = uploaded.len(),
                        error = %e,
                        "product image upload failed, rolling back product record"
                    );
                    compensations.unwind().await;
                    metrics::counter!("publication_failed").increment(1);
                    return Err(e.into());
                }
            }
        }

        // Step 3: backfill the image list. Past the pivot — the product row
        // and its images survive a failure here.
        compensations.disarm();
        self.products
            .update_by_id(product_id, ProductUpdate {
                image_paths: Some(uploaded),
                ..ProductUpdate::default()
            })
            .await
            .map_err(|e| {
                metrics::counter!("publication_failed").increment(1);
                WorkflowError::from(e)
            })?;

        // Step 4: best-effort cross-link.
        let link_warning = match self
            .orders
            .update_by_id(order_id, OrderUpdate {
                linked_product_id: Some(product_id),
                ..OrderUpdate::default()
            })
            .await
        {
            Ok(_) => None,
            Err(e) => {
                metrics::counter!("publication_link_failures_total").increment(1);
                tracing::warn!(
                    %order_id,
                    %product_id,
                    error = %e,
                    "order link update failed, product remains published"
                );
                Some(format!(
                    "order {order_id} could not be linked to product {product_id}: {e}"
                ))
            }
        };

        metrics::histogram!("publication_duration_seconds")
            .record(saga_start.elapsed().as_secs_f64());
        metrics::counter!("publication_completed").increment(1);
        tracing::info!(%product_id, linked = link_warning.is_none(), "publication completed");

        Ok(Published {
            product_id,
            link_warning,
        })
    }
}
