//! PostgreSQL repository integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p repository --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{CategoryId, OrderId, RequesterId};
use domain::{Category, CategoryName, Money, Order, OrderStatus, Product};
use repository::{
    CategoryRepository, OrderRepository, OrderUpdate, PostgresCategoryRepository,
    PostgresOrderRepository, PostgresProductRepository, PostgresRequesterRepository,
    ProductRepository, ProductUpdate, RepositoryError, RequesterRepository, StatusFilter,
};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use serial_test::serial;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            for sql in [
                include_str!("../../../migrations/0001_create_requesters.sql"),
                include_str!("../../../migrations/0002_create_categories.sql"),
                include_str!("../../../migrations/0003_create_products.sql"),
                include_str!("../../../migrations/0004_create_custom_orders.sql"),
                include_str!("../../../migrations/0005_create_storage.sql"),
            ] {
                sqlx::raw_sql(sql).execute(&temp_pool).await.unwrap();
            }
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

struct TestStores {
    orders: PostgresOrderRepository,
    products: PostgresProductRepository,
    categories: PostgresCategoryRepository,
    requesters: PostgresRequesterRepository,
}

/// Get fresh stores over one pool with cleared tables
async fn get_test_stores() -> TestStores {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE custom_orders, products, categories, requesters CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    TestStores {
        orders: PostgresOrderRepository::new(pool.clone()),
        products: PostgresProductRepository::new(pool.clone()),
        categories: PostgresCategoryRepository::new(pool.clone()),
        requesters: PostgresRequesterRepository::new(pool),
    }
}

fn sample_order(requester: &str) -> Order {
    Order::new(
        RequesterId::new(requester),
        "A diorama of a mountain village",
        "30cm",
        format!("{requester}/custom-orders/scope/source/main.png"),
        vec![
            format!("{requester}/custom-orders/scope/refs/0_a.png"),
            format!("{requester}/custom-orders/scope/refs/1_b.png"),
        ],
    )
}

fn sample_product(category: i32) -> Product {
    Product::new(
        "Mountain village diorama",
        "Hand-painted, 30cm base",
        Money::from_minor(120_000),
        Money::from_minor(30_000),
        1,
        CategoryId::new(category),
    )
}

async fn seed_requester(stores: &TestStores, id: &str) -> RequesterId {
    let requester = RequesterId::new(id);
    stores.requesters.upsert(&requester).await.unwrap();
    requester
}

async fn seed_category(stores: &TestStores, id: i32, name: CategoryName) {
    stores
        .categories
        .insert(Category::new(CategoryId::new(id), name, None))
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
async fn order_insert_and_get_roundtrip() {
    let stores = get_test_stores().await;
    seed_requester(&stores, "user_1").await;

    let order = sample_order("user_1");
    let id = order.id;
    stores.orders.insert(order.clone()).await.unwrap();

    let loaded = stores.orders.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(loaded.id, order.id);
    assert_eq!(loaded.status, OrderStatus::PendingReview);
    assert_eq!(loaded.source_image_path, order.source_image_path);
    assert_eq!(loaded.reference_image_paths, order.reference_image_paths);
    assert!(loaded.quoted_price.is_none());
    assert!(loaded.completed_image_paths.is_empty());
    assert!(loaded.linked_product_id.is_none());
}

#[tokio::test]
#[serial]
async fn order_insert_requires_requester_row() {
    let stores = get_test_stores().await;

    let err = stores.orders.insert(sample_order("ghost")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)));
}

#[tokio::test]
#[serial]
async fn order_partial_update_leaves_other_fields() {
    let stores = get_test_stores().await;
    seed_requester(&stores, "user_1").await;

    let order = sample_order("user_1");
    let id = order.id;
    stores.orders.insert(order).await.unwrap();

    let updated = stores
        .orders
        .update_by_id(id, OrderUpdate {
            status: Some(OrderStatus::QuoteProvided),
            quoted_price: Some(Money::from_minor(50_000)),
            ..OrderUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::QuoteProvided);
    assert_eq!(updated.quoted_price, Some(Money::from_minor(50_000)));
    assert_eq!(updated.reference_image_paths.len(), 2);
    assert!(updated.linked_product_id.is_none());
}

#[tokio::test]
#[serial]
async fn order_update_of_missing_row_is_not_found() {
    let stores = get_test_stores().await;

    let err = stores
        .orders
        .update_by_id(OrderId::new(), OrderUpdate {
            status: Some(OrderStatus::Shipped),
            ..OrderUpdate::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
#[serial]
async fn order_lists_filter_by_status_and_requester() {
    let stores = get_test_stores().await;
    seed_requester(&stores, "user_1").await;
    seed_requester(&stores, "user_2").await;

    let a = sample_order("user_1");
    let b = sample_order("user_2");
    let b_id = b.id;
    stores.orders.insert(a).await.unwrap();
    stores.orders.insert(b).await.unwrap();
    stores
        .orders
        .update_by_id(b_id, OrderUpdate {
            status: Some(OrderStatus::Completed),
            ..OrderUpdate::default()
        })
        .await
        .unwrap();

    let all = stores.orders.list_by_status(StatusFilter::All).await.unwrap();
    assert_eq!(all.len(), 2);

    let completed = stores
        .orders
        .list_by_status(StatusFilter::Only(OrderStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, b_id);

    let user_1 = stores
        .orders
        .list_by_requester(&RequesterId::new("user_1"), StatusFilter::All)
        .await
        .unwrap();
    assert_eq!(user_1.len(), 1);
}

#[tokio::test]
#[serial]
async fn product_crud_roundtrip() {
    let stores = get_test_stores().await;
    seed_category(&stores, 4, CategoryName::Diorama).await;

    let product = sample_product(4);
    let id = product.id;
    stores.products.insert(product).await.unwrap();

    let loaded = stores.products.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(loaded.price, Money::from_minor(150_000));
    assert!(loaded.image_paths.is_empty());
    assert!(loaded.is_active);

    let updated = stores
        .products
        .update_by_id(id, ProductUpdate {
            image_paths: Some(vec![format!("products/{id}/images/0_front.png")]),
            ..ProductUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.image_paths.len(), 1);

    stores.products.delete_by_id(id).await.unwrap();
    assert!(stores.products.get_by_id(id).await.unwrap().is_none());

    // Idempotent: deleting again is fine.
    stores.products.delete_by_id(id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn product_lists_respect_category_and_limit() {
    let stores = get_test_stores().await;
    seed_category(&stores, 4, CategoryName::Diorama).await;
    seed_category(&stores, 6, CategoryName::Mecha).await;

    for _ in 0..3 {
        stores.products.insert(sample_product(4)).await.unwrap();
    }
    stores.products.insert(sample_product(6)).await.unwrap();

    let hidden = sample_product(4);
    let hidden_id = hidden.id;
    stores.products.insert(hidden).await.unwrap();
    stores
        .products
        .update_by_id(hidden_id, ProductUpdate {
            is_active: Some(false),
            ..ProductUpdate::default()
        })
        .await
        .unwrap();

    let active = stores.products.list_active(10).await.unwrap();
    assert_eq!(active.len(), 4);

    let dioramas = stores
        .products
        .list_by_category(CategoryId::new(4), 2)
        .await
        .unwrap();
    assert_eq!(dioramas.len(), 2);
    assert!(dioramas.iter().all(|p| p.category_id == CategoryId::new(4)));
}

#[tokio::test]
#[serial]
async fn category_list_is_ordered_by_id() {
    let stores = get_test_stores().await;
    seed_category(&stores, 6, CategoryName::Mecha).await;
    seed_category(&stores, 1, CategoryName::Anime).await;

    let listed = stores.categories.list_all().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, CategoryName::Anime);
    assert_eq!(listed[1].name, CategoryName::Mecha);

    let loaded = stores
        .categories
        .get_by_id(CategoryId::new(6))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name, CategoryName::Mecha);
}

#[tokio::test]
#[serial]
async fn requester_upsert_is_idempotent() {
    let stores = get_test_stores().await;
    let id = RequesterId::new("user_1");

    stores.requesters.upsert(&id).await.unwrap();
    stores.requesters.upsert(&id).await.unwrap();

    assert!(stores.requesters.exists(&id).await.unwrap());
    assert!(
        !stores
            .requesters
            .exists(&RequesterId::new("ghost"))
            .await
            .unwrap()
    );
}

#[tokio::test]
#[serial]
async fn order_link_to_product_persists() {
    let stores = get_test_stores().await;
    seed_requester(&stores, "user_1").await;
    seed_category(&stores, 4, CategoryName::Diorama).await;

    let order = sample_order("user_1");
    let order_id = order.id;
    stores.orders.insert(order).await.unwrap();

    let product = sample_product(4);
    let product_id = product.id;
    stores.products.insert(product).await.unwrap();

    let updated = stores
        .orders
        .update_by_id(order_id, OrderUpdate {
            linked_product_id: Some(product_id),
            ..OrderUpdate::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.linked_product_id, Some(product_id));
}
