//! Intake saga: validation → image upload → order-record creation.

use common::{OrderId, RequesterId};
use domain::{DomainError, ImageFile, MIN_DESCRIPTION_CHARS, Order};
use repository::{OrderRepository, RequesterRepository};
use storage::StorageGateway;
use uuid::Uuid;

use crate::compensation::CompensationStack;
use crate::error::Result;

/// A requester's custom-fabrication submission.
#[derive(Debug, Clone)]
pub struct IntakeRequest {
    pub requester_id: RequesterId,
    pub description: String,
    pub size_preference: String,
    pub source_image: ImageFile,
    pub reference_images: Vec<ImageFile>,
}

/// Orchestrates order intake.
///
/// Uploads happen one at a time under a freshly generated request scope, so
/// concurrent submissions by the same requester never collide. Any failure
/// after the first upload deletes every object this invocation wrote before
/// surfacing the error — no orphaned objects without an owning record.
pub struct IntakeSaga<G, O, R>
where
    G: StorageGateway,
    O: OrderRepository,
    R: RequesterRepository,
{
    gateway: G,
    orders: O,
    requesters: R,
}

impl<G, O, R> IntakeSaga<G, O, R>
where
    G: StorageGateway + Clone + 'static,
    O: OrderRepository,
    R: RequesterRepository,
{
    /// Creates a new intake saga.
    pub fn new(gateway: G, orders: O, requesters: R) -> Self {
        Self {
            gateway,
            orders,
            requesters,
        }
    }

    /// Submits a new order, returning its id.
    ///
    /// Validation runs before any external effect; see the type-level docs
    /// for the failure policy after uploads begin.
    #[tracing::instrument(skip(self, request), fields(requester_id = %request.requester_id))]
    pub async fn submit(&self, request: IntakeRequest) -> Result<OrderId> {
        metrics::counter!("intake_submissions_total").increment(1);
        let saga_start = std::time::Instant::now();

        // Fail fast: no external effects until every input has passed.
        let description = request.description.trim().to_string();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(DomainError::DescriptionTooShort {
                min: MIN_DESCRIPTION_CHARS,
            }
            .into());
        }
        let size_preference = request.size_preference.trim().to_string();
        if size_preference.is_empty() {
            return Err(DomainError::SizePreferenceRequired.into());
        }
        request.source_image.validate("source image")?;
        for (i, image) in request.reference_images.iter().enumerate() {
            image.validate(&format!("reference image {}", i + 1))?;
        }

        // Fresh scope per submission; the namespace cannot pre-exist.
        let scope = Uuid::new_v4();
        let prefix = format!("{}/custom-orders/{scope}", request.requester_id);

        let mut compensations = CompensationStack::new();

        let source_path = format!("{prefix}/source/{}", request.source_image.filename);
        tracing::debug!(path = %source_path, "uploading source image");
        if let Err(e) = self
            .gateway
            .put(
                &source_path,
                request.source_image.bytes,
                &request.source_image.content_type,
                false,
            )
            .await
        {
            metrics::counter!("intake_failed").increment(1);
            return Err(e.into());
        }
        self.push_object_delete(&mut compensations, source_path.clone());

        let mut reference_paths = Vec::with_capacity(request.reference_images.len());
        for (i, image) in request.reference_images.into_iter().enumerate() {
            let path = format!("{prefix}/refs/{i}_{}", image.filename);
            tracing::debug!(path = %path, "uploading reference image");
            match self
                .gateway
                .put(&path, image.bytes, &image.content_type, false)
                .await
            {
                Ok(()) => {
                    self.push_object_delete(&mut compensations, path.clone());
                    reference_paths.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "reference upload failed, deleting prior uploads");
                    compensations.unwind().await;
                    metrics::counter!("intake_failed").increment(1);
                    return Err(e.into());
                }
            }
        }

        // Referential invariant: the requester row must exist before the
        // order insert.
        if let Err(e) = self.requesters.upsert(&request.requester_id).await {
            compensations.unwind().await;
            metrics::counter!("intake_failed").increment(1);
            return Err(e.into());
        }

        let order = Order::new(
            request.requester_id,
            description,
            size_preference,
            source_path,
            reference_paths,
        );
        let order_id = order.id;
        if let Err(e) = self.orders.insert(order).await {
            tracing::warn!(%order_id, error = %e, "order insert failed, deleting uploads");
            compensations.unwind().await;
            metrics::counter!("intake_failed").increment(1);
            return Err(e.into());
        }

        compensations.disarm();
        metrics::histogram!("intake_duration_seconds").record(saga_start.elapsed().as_secs_f64());
        metrics::counter!("intake_completed").increment(1);
        tracing::info!(%order_id, "intake completed");

        Ok(order_id)
    }

    fn push_object_delete(&self, compensations: &mut CompensationStack, path: String) {
        let gateway = self.gateway.clone();
        compensations.push(format!("delete object {path}"), Box::pin(async move {
            gateway.delete(&path).await?;
            Ok(())
        }));
    }
}
