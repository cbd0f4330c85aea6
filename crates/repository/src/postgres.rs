//! PostgreSQL store implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CategoryId, OrderId, ProductId, RequesterId};
use domain::{Category, CategoryName, Money, Order, OrderStatus, Product};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::category::CategoryRepository;
use crate::error::{RepositoryError, Result};
use crate::order::{OrderRepository, OrderUpdate, StatusFilter};
use crate::product::{ProductRepository, ProductUpdate};
use crate::requester::RequesterRepository;

/// Runs the workspace database migrations.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

fn row_to_order(row: PgRow) -> Result<Order> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e: domain::DomainError| RepositoryError::Decode(e.to_string()))?;

    Ok(Order {
        id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
        requester_id: RequesterId::new(row.try_get::<String, _>("requester_id")?),
        description: row.try_get("description")?,
        size_preference: row.try_get("size_preference")?,
        source_image_path: row.try_get("source_image_path")?,
        reference_image_paths: row.try_get("reference_image_paths")?,
        status,
        quoted_price: row
            .try_get::<Option<i64>, _>("quoted_price")?
            .map(Money::from_minor),
        completed_image_paths: row.try_get("completed_image_paths")?,
        linked_product_id: row
            .try_get::<Option<Uuid>, _>("linked_product_id")?
            .map(ProductId::from_uuid),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn row_to_product(row: PgRow) -> Result<Product> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: Money::from_minor(row.try_get("price")?),
        base_price: Money::from_minor(row.try_get("base_price")?),
        painting_price: Money::from_minor(row.try_get("painting_price")?),
        stock_quantity: row.try_get::<i32, _>("stock_quantity")? as u32,
        category_id: CategoryId::new(row.try_get("category_id")?),
        image_paths: row.try_get("image_paths")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn row_to_category(row: PgRow) -> Result<Category> {
    let name: String = row.try_get("name")?;
    let name: CategoryName = name
        .parse()
        .map_err(|e: domain::DomainError| RepositoryError::Decode(e.to_string()))?;

    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name,
        description: row.try_get("description")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

const ORDER_COLUMNS: &str = "id, requester_id, description, size_preference, source_image_path, \
     reference_image_paths, status, quoted_price, completed_image_paths, linked_product_id, \
     created_at";

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO custom_orders
                (id, requester_id, description, size_preference, source_image_path,
                 reference_image_paths, status, quoted_price, completed_image_paths,
                 linked_product_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.requester_id.as_str())
        .bind(&order.description)
        .bind(&order.size_preference)
        .bind(&order.source_image_path)
        .bind(&order.reference_image_paths)
        .bind(order.status.as_str())
        .bind(order.quoted_price.map(|p| p.minor()))
        .bind(&order.completed_image_paths)
        .bind(order.linked_product_id.map(|id| id.as_uuid()))
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM custom_orders WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_order).transpose()
    }

    async fn update_by_id(&self, id: OrderId, update: OrderUpdate) -> Result<Order> {
        let sql = format!(
            r#"
            UPDATE custom_orders
            SET status = COALESCE($2, status),
                quoted_price = COALESCE($3, quoted_price),
                completed_image_paths = COALESCE($4, completed_image_paths),
                linked_product_id = COALESCE($5, linked_product_id)
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(update.status.map(|s| s.as_str()))
            .bind(update.quoted_price.map(|p| p.minor()))
            .bind(update.completed_image_paths)
            .bind(update.linked_product_id.map(|p| p.as_uuid()))
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_order)
            .transpose()?
            .ok_or_else(|| RepositoryError::not_found("order", id))
    }

    async fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Order>> {
        let rows = match filter {
            StatusFilter::All => {
                let sql =
                    format!("SELECT {ORDER_COLUMNS} FROM custom_orders ORDER BY created_at DESC");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
            StatusFilter::Only(status) => {
                let sql = format!(
                    "SELECT {ORDER_COLUMNS} FROM custom_orders WHERE status = $1 \
                     ORDER BY created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(row_to_order).collect()
    }

    async fn list_by_requester(
        &self,
        requester_id: &RequesterId,
        filter: StatusFilter,
    ) -> Result<Vec<Order>> {
        let rows = match filter {
            StatusFilter::All => {
                let sql = format!(
                    "SELECT {ORDER_COLUMNS} FROM custom_orders WHERE requester_id = $1 \
                     ORDER BY created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(requester_id.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            StatusFilter::Only(status) => {
                let sql = format!(
                    "SELECT {ORDER_COLUMNS} FROM custom_orders \
                     WHERE requester_id = $1 AND status = $2 ORDER BY created_at DESC"
                );
                sqlx::query(&sql)
                    .bind(requester_id.as_str())
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(row_to_order).collect()
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, base_price, painting_price, \
     stock_quantity, category_id, image_paths, is_active, created_at";

/// PostgreSQL-backed product store.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new product store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, base_price, painting_price,
                 stock_quantity, category_id, image_paths, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.minor())
        .bind(product.base_price.minor())
        .bind(product.painting_price.minor())
        .bind(product.stock_quantity as i32)
        .bind(product.category_id.as_i32())
        .bind(&product.image_paths)
        .bind(product.is_active)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_product).transpose()
    }

    async fn update_by_id(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let sql = format!(
            r#"
            UPDATE products
            SET image_paths = COALESCE($2, image_paths),
                is_active = COALESCE($3, is_active),
                stock_quantity = COALESCE($4, stock_quantity)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(update.image_paths)
            .bind(update.is_active)
            .bind(update.stock_quantity.map(|q| q as i32))
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_product)
            .transpose()?
            .ok_or_else(|| RepositoryError::not_found("product", id))
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_active(&self, limit: i64) -> Result<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active \
             ORDER BY created_at DESC LIMIT $1"
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn list_by_category(&self, category_id: CategoryId, limit: i64) -> Result<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active AND category_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(category_id.as_i32())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_product).collect()
    }
}

/// PostgreSQL-backed category store.
#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    /// Creates a new category store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn insert(&self, category: Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.id.as_i32())
        .bind(category.name.as_str())
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM categories WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_category).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let rows =
            sqlx::query("SELECT id, name, description, created_at FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(row_to_category).collect()
    }
}

/// PostgreSQL-backed requester store.
#[derive(Clone)]
pub struct PostgresRequesterRepository {
    pool: PgPool,
}

impl PostgresRequesterRepository {
    /// Creates a new requester store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequesterRepository for PostgresRequesterRepository {
    async fn upsert(&self, id: &RequesterId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO requesters (id, created_at)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists(&self, id: &RequesterId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM requesters WHERE id = $1)")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
