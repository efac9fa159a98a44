use async_trait::async_trait;
use sqlx::PgPool;

use crate::{CartStore, Result};

/// PostgreSQL-backed cart store.
///
/// Each key maps to one row of `cart_entries`; writes are single-statement
/// upserts, so a failed write leaves the previous document in place.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and returns a store over a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    #[tracing::instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT value FROM cart_entries WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        value
            .map(|v| serde_json::to_string(&v))
            .transpose()
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self, value))]
    async fn write(&self, key: &str, value: String) -> Result<()> {
        let document: serde_json::Value = serde_json::from_str(&value)?;

        sqlx::query(
            r#"
            INSERT INTO cart_entries (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(document)
        .execute(&self.pool)
        .await?;

        tracing::debug!(key, "cart entry written");
        Ok(())
    }
}
