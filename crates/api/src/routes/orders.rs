//! Requester-facing order endpoints: intake and order reads.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use common::OrderId;
use domain::Order;
use repository::{OrderRepository, StatusFilter};
use serde::{Deserialize, Serialize};
use storage::StorageGateway;
use workflow::{IntakeRequest, WorkflowError};

use crate::error::ApiError;
use crate::routes::{caller_from_headers, image_from_field, text_from_field};
use crate::state::AppState;

/// TTL for signed image URLs handed to read endpoints.
const SIGNED_URL_TTL: Duration = Duration::from_secs(600);

// -- Request/response types --

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct OrderSummaryResponse {
    pub id: String,
    pub status: String,
    pub size_preference: String,
    pub quoted_price: Option<i64>,
    pub linked_product_id: Option<String>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub requester_id: String,
    pub description: String,
    pub size_preference: String,
    pub status: String,
    pub quoted_price: Option<i64>,
    pub source_image_url: Option<String>,
    pub reference_image_urls: Vec<String>,
    pub completed_image_urls: Vec<String>,
    pub linked_product_id: Option<String>,
    pub created_at: String,
}

fn summary(order: &Order) -> OrderSummaryResponse {
    OrderSummaryResponse {
        id: order.id.to_string(),
        status: order.status.to_string(),
        size_preference: order.size_preference.clone(),
        quoted_price: order.quoted_price.map(|p| p.minor()),
        linked_product_id: order.linked_product_id.map(|id| id.to_string()),
        created_at: order.created_at.to_rfc3339(),
    }
}

/// Builds the detail response, signing image URLs best-effort: a path whose
/// signing fails is omitted rather than failing the read.
async fn detail(state: &AppState, order: Order) -> OrderResponse {
    let source_image_url = state
        .gateway
        .signed_read_url(&order.source_image_path, SIGNED_URL_TTL)
        .await
        .ok();

    let mut reference_image_urls = Vec::with_capacity(order.reference_image_paths.len());
    for path in &order.reference_image_paths {
        if let Ok(url) = state.gateway.signed_read_url(path, SIGNED_URL_TTL).await {
            reference_image_urls.push(url);
        }
    }

    let mut completed_image_urls = Vec::with_capacity(order.completed_image_paths.len());
    for path in &order.completed_image_paths {
        if let Ok(url) = state.gateway.signed_read_url(path, SIGNED_URL_TTL).await {
            completed_image_urls.push(url);
        }
    }

    OrderResponse {
        id: order.id.to_string(),
        requester_id: order.requester_id.to_string(),
        description: order.description,
        size_preference: order.size_preference,
        status: order.status.to_string(),
        quoted_price: order.quoted_price.map(|p| p.minor()),
        source_image_url,
        reference_image_urls,
        completed_image_urls,
        linked_product_id: order.linked_product_id.map(|id| id.to_string()),
        created_at: order.created_at.to_rfc3339(),
    }
}

pub(crate) fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid order id: {e}")))
}

pub(crate) fn parse_status_filter(status: Option<&str>) -> Result<StatusFilter, ApiError> {
    match status {
        None | Some("all") => Ok(StatusFilter::All),
        Some(s) => {
            let status = s
                .parse()
                .map_err(|e| ApiError::Workflow(WorkflowError::Validation(e)))?;
            Ok(StatusFilter::Only(status))
        }
    }
}

// -- Handlers --

/// POST /custom-orders — multipart intake submission.
///
/// Fields: `description`, `size_preference`, one `source_image` file, and
/// zero or more `reference_images` files.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let caller = caller_from_headers(&headers)?;

    let mut description = String::new();
    let mut size_preference = String::new();
    let mut source_image = None;
    let mut reference_images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name().map(str::to_string).as_deref() {
            Some("description") => description = text_from_field(field).await?,
            Some("size_preference") => size_preference = text_from_field(field).await?,
            Some("source_image") => source_image = Some(image_from_field(field).await?),
            Some("reference_images") => reference_images.push(image_from_field(field).await?),
            _ => {}
        }
    }

    let source_image = source_image
        .ok_or_else(|| ApiError::BadRequest("source_image is required".to_string()))?;

    let order_id = state
        .intake
        .submit(IntakeRequest {
            requester_id: caller.id,
            description,
            size_preference,
            source_image,
            reference_images,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            order_id: order_id.to_string(),
            status: "pending_review".to_string(),
        }),
    ))
}

/// GET /custom-orders — list orders, optionally filtered by `?status=`.
///
/// Operators see every order; requesters see their own.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrderSummaryResponse>>, ApiError> {
    let caller = caller_from_headers(&headers)?;
    let filter = parse_status_filter(query.status.as_deref())?;

    let orders = if caller.is_operator {
        state.orders.list_by_status(filter).await?
    } else {
        state.orders.list_by_requester(&caller.id, filter).await?
    };

    Ok(Json(orders.iter().map(summary).collect()))
}

/// GET /custom-orders/{id} — order detail with signed image URLs.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let caller = caller_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;

    let order = state
        .orders
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order not found: {id}")))?;

    // Requesters only ever see their own orders.
    if !caller.is_operator && caller.id != order.requester_id {
        return Err(ApiError::NotFound(format!("order not found: {id}")));
    }

    Ok(Json(detail(&state, order).await))
}
