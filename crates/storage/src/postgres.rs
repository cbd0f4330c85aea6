//! PostgreSQL-backed storage gateway.
//!
//! Object bytes live in a `storage_objects` bytea table; signed read URLs
//! are capability tokens recorded in `storage_signed_urls` with an expiry.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::gateway::StorageGateway;

/// PostgreSQL storage gateway.
#[derive(Clone)]
pub struct PostgresStorageGateway {
    pool: PgPool,
    public_base_url: String,
}

impl PostgresStorageGateway {
    /// Creates a new gateway issuing signed URLs under `public_base_url`.
    pub fn new(pool: PgPool, public_base_url: impl Into<String>) -> Self {
        Self {
            pool,
            public_base_url: public_base_url.into(),
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StorageGateway for PostgresStorageGateway {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        overwrite: bool,
    ) -> Result<()> {
        if overwrite {
            sqlx::query(
                r#"
                INSERT INTO storage_objects (path, content_type, bytes, created_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (path) DO UPDATE
                SET content_type = EXCLUDED.content_type,
                    bytes = EXCLUDED.bytes,
                    created_at = EXCLUDED.created_at
                "#,
            )
            .bind(path)
            .bind(content_type)
            .bind(&bytes)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO storage_objects (path, content_type, bytes, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (path) DO NOTHING
            "#,
        )
        .bind(path)
        .bind(content_type)
        .bind(&bytes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM storage_objects WHERE path = $1)")
                .bind(path)
                .fetch_one(&self.pool)
                .await?;

        if !exists {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let token = Uuid::new_v4();
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| StorageError::Backend(format!("invalid ttl: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO storage_signed_urls (token, path, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token)
        .bind(path)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(format!(
            "{}/objects/signed/{token}",
            self.public_base_url.trim_end_matches('/')
        ))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        sqlx::query("DELETE FROM storage_objects WHERE path = $1")
            .bind(path)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
