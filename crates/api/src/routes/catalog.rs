//! Read-only catalog endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{CategoryId, ProductId};
use domain::Product;
use repository::{CategoryRepository, ProductRepository};
use serde::{Deserialize, Serialize};
use storage::StorageGateway;

use crate::error::ApiError;
use crate::state::AppState;

const SIGNED_URL_TTL: Duration = Duration::from_secs(600);
const DEFAULT_LIMIT: i64 = 8;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<i32>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub base_price: i64,
    pub painting_price: i64,
    pub stock_quantity: u32,
    pub category_id: i32,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

async fn product_response(state: &AppState, product: Product) -> ProductResponse {
    let mut image_urls = Vec::with_capacity(product.image_paths.len());
    for path in &product.image_paths {
        if let Ok(url) = state.gateway.signed_read_url(path, SIGNED_URL_TTL).await {
            image_urls.push(url);
        }
    }

    ProductResponse {
        id: product.id.to_string(),
        name: product.name,
        description: product.description,
        price: product.price.minor(),
        base_price: product.base_price.minor(),
        painting_price: product.painting_price.minor(),
        stock_quantity: product.stock_quantity,
        category_id: product.category_id.as_i32(),
        image_urls,
        is_active: product.is_active,
        created_at: product.created_at.to_rfc3339(),
    }
}

/// GET /products — newest active products, optionally by category.
#[tracing::instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let products = match query.category_id {
        Some(id) => {
            state
                .products
                .list_by_category(CategoryId::new(id), limit)
                .await?
        }
        None => state.products.list_active(limit).await?,
    };

    let mut responses = Vec::with_capacity(products.len());
    for product in products {
        responses.push(product_response(&state, product).await);
    }
    Ok(Json(responses))
}

/// GET /products/{id} — product detail with signed image URLs.
#[tracing::instrument(skip(state))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id: ProductId = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid product id: {e}")))?;

    let product = state
        .products
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product not found: {id}")))?;

    Ok(Json(product_response(&state, product).await))
}

/// GET /categories — all categories in id order.
#[tracing::instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.categories.list_all().await?;

    Ok(Json(
        categories
            .into_iter()
            .map(|c| CategoryResponse {
                id: c.id.as_i32(),
                name: c.name.to_string(),
                description: c.description,
            })
            .collect(),
    ))
}
