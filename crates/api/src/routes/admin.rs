//! Operator endpoints: quote, status change, completion, publication.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::CategoryId;
use domain::{Money, Order};
use serde::{Deserialize, Serialize};
use workflow::{ProductDraft, WorkflowError};

use crate::error::ApiError;
use crate::routes::orders::parse_order_id;
use crate::routes::{caller_from_headers, image_from_field, text_from_field};
use crate::state::AppState;

// -- Request/response types --

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct OrderActionResponse {
    pub id: String,
    pub status: String,
    pub quoted_price: Option<i64>,
    pub completed_image_paths: Vec<String>,
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub product_id: String,
    pub link_warning: Option<String>,
}

fn action_response(order: Order) -> OrderActionResponse {
    OrderActionResponse {
        id: order.id.to_string(),
        status: order.status.to_string(),
        quoted_price: order.quoted_price.map(|p| p.minor()),
        completed_image_paths: order.completed_image_paths,
    }
}

// -- Handlers --

/// POST /custom-orders/{id}/quote — record a quote.
#[tracing::instrument(skip(state, headers))]
pub async fn provide_quote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<OrderActionResponse>, ApiError> {
    let caller = caller_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;

    let order = state
        .status
        .provide_quote(&caller, order_id, Money::from_minor(req.price))
        .await?;

    Ok(Json(action_response(order)))
}

/// POST /custom-orders/{id}/status — set the order status.
#[tracing::instrument(skip(state, headers))]
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<OrderActionResponse>, ApiError> {
    let caller = caller_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;
    let new_status = req
        .status
        .parse()
        .map_err(|e| ApiError::Workflow(WorkflowError::Validation(e)))?;

    let order = state.status.set_status(&caller, order_id, new_status).await?;

    Ok(Json(action_response(order)))
}

/// POST /custom-orders/{id}/completed-images — multipart completion upload.
///
/// Fields: 1–5 `images` files.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn complete_with_images(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<OrderActionResponse>, ApiError> {
    let caller = caller_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;

    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("images") {
            images.push(image_from_field(field).await?);
        }
    }

    let order = state
        .status
        .complete_with_images(&caller, order_id, images)
        .await?;

    Ok(Json(action_response(order)))
}

/// POST /custom-orders/{id}/publish — convert a completed order into a
/// catalog product.
///
/// Multipart fields: `name`, `description`, `base_price`, `painting_price`,
/// `stock_quantity`, `category_id`, and 1–5 `images` files.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn publish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PublishResponse>), ApiError> {
    let caller = caller_from_headers(&headers)?;
    let order_id = parse_order_id(&id)?;

    let mut name = String::new();
    let mut description = String::new();
    let mut base_price = None;
    let mut painting_price = None;
    let mut stock_quantity = None;
    let mut category_id = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name().map(str::to_string).as_deref() {
            Some("name") => name = text_from_field(field).await?,
            Some("description") => description = text_from_field(field).await?,
            Some("base_price") => base_price = Some(parse_i64(field, "base_price").await?),
            Some("painting_price") => {
                painting_price = Some(parse_i64(field, "painting_price").await?);
            }
            Some("stock_quantity") => {
                stock_quantity = Some(parse_i64(field, "stock_quantity").await? as u32);
            }
            Some("category_id") => {
                category_id = Some(CategoryId::new(parse_i64(field, "category_id").await? as i32));
            }
            Some("images") => images.push(image_from_field(field).await?),
            _ => {}
        }
    }

    let draft = ProductDraft {
        name,
        description,
        base_price: Money::from_minor(
            base_price.ok_or_else(|| ApiError::BadRequest("base_price is required".to_string()))?,
        ),
        painting_price: Money::from_minor(painting_price.unwrap_or(0)),
        stock_quantity: stock_quantity.unwrap_or(0),
        category_id: category_id
            .ok_or_else(|| ApiError::BadRequest("category_id is required".to_string()))?,
    };

    let published = state
        .publication
        .publish(&caller, order_id, draft, images)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            product_id: published.product_id.to_string(),
            link_warning: published.link_warning,
        }),
    ))
}

async fn parse_i64(
    field: axum::extract::multipart::Field<'_>,
    label: &'static str,
) -> Result<i64, ApiError> {
    text_from_field(field)
        .await?
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid {label}: {e}")))
}
