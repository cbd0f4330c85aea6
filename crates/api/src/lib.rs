//! HTTP API server with observability for the fabrication commission
//! service.
//!
//! Exposes the intake saga, operator actions, publication, and read
//! endpoints with structured logging (tracing) and Prometheus metrics.
//! Caller identity arrives pre-authenticated from the auth boundary as
//! `x-caller-id` / `x-caller-role` headers.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use common::CategoryId;
use domain::{Category, CategoryName};
use metrics_exporter_prometheus::PrometheusHandle;
use repository::CategoryRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;
use state::DynCategories;

/// Body ceiling: five 6 MiB images plus form fields and framing.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/custom-orders", post(routes::orders::submit))
        .route("/custom-orders", get(routes::orders::list))
        .route("/custom-orders/{id}", get(routes::orders::get))
        .route("/custom-orders/{id}/quote", post(routes::admin::provide_quote))
        .route("/custom-orders/{id}/status", post(routes::admin::set_status))
        .route(
            "/custom-orders/{id}/completed-images",
            post(routes::admin::complete_with_images),
        )
        .route("/custom-orders/{id}/publish", post(routes::admin::publish))
        .route("/products", get(routes::catalog::list_products))
        .route("/products/{id}", get(routes::catalog::get_product))
        .route("/categories", get(routes::catalog::list_categories))
        .with_state(state)
        .merge(metrics_router)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Seeds the fixed category set when the store is empty.
pub async fn seed_categories(categories: &DynCategories) -> repository::Result<()> {
    if !categories.list_all().await?.is_empty() {
        return Ok(());
    }

    for (i, name) in CategoryName::ALL.into_iter().enumerate() {
        categories
            .insert(Category::new(CategoryId::new(i as i32 + 1), name, None))
            .await?;
    }
    tracing::info!(count = CategoryName::ALL.len(), "seeded categories");
    Ok(())
}

/// Creates application state over the in-memory stores.
pub fn create_memory_state() -> Arc<AppState> {
    use repository::{
        InMemoryCategoryRepository, InMemoryOrderRepository, InMemoryProductRepository,
        InMemoryRequesterRepository,
    };
    use storage::InMemoryStorageGateway;

    AppState::new(
        Arc::new(InMemoryStorageGateway::new()),
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(InMemoryProductRepository::new()),
        Arc::new(InMemoryCategoryRepository::new()),
        Arc::new(InMemoryRequesterRepository::new()),
    )
}

/// Creates application state over PostgreSQL.
pub fn create_postgres_state(
    pool: sqlx::PgPool,
    public_base_url: impl Into<String>,
) -> Arc<AppState> {
    use repository::{
        PostgresCategoryRepository, PostgresOrderRepository, PostgresProductRepository,
        PostgresRequesterRepository,
    };
    use storage::PostgresStorageGateway;

    AppState::new(
        Arc::new(PostgresStorageGateway::new(pool.clone(), public_base_url)),
        Arc::new(PostgresOrderRepository::new(pool.clone())),
        Arc::new(PostgresProductRepository::new(pool.clone())),
        Arc::new(PostgresCategoryRepository::new(pool.clone())),
        Arc::new(PostgresRequesterRepository::new(pool)),
    )
}
