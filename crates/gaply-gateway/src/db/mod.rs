//! PostgreSQL metadata store.
//!
//! Thin accessors over one connection pool. Every operation is a single
//! statement; nothing spans records in a transaction. Accessors are grouped by
//! table in the submodules and all hang off [`Database`].

mod edits;
mod gaps;
mod jobs;
mod papers;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::instrument;

use crate::search::PaperIndex;

/// Maximum connections in the pool.
const MAX_CONNECTIONS: u32 = 20;

/// Connections kept open while idle.
const MIN_CONNECTIONS: u32 = 5;

/// Connections are recycled after this long.
const MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Idle connections above the minimum are closed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Metadata store errors.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Failed to reach the database.
    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    /// Failed to run migrations.
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A statement failed.
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// An update matched no row.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Table-level entity name.
        entity: &'static str,
        /// Key that was looked up.
        id: String,
    },
}

impl StoreError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    /// Whether the error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Query(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

/// Connection pool wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the database cannot be reached.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .min_connections(MIN_CONNECTIONS)
            .max_lifetime(MAX_LIFETIME)
            .idle_timeout(IDLE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(StoreError::Connection)?;

        tracing::info!(max_connections = MAX_CONNECTIONS, "Database pool ready");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations from `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] if a migration fails.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Check the database answers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the round trip fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PaperIndex for Database {
    async fn paper_exists(&self, doi: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM papers WHERE doi = $1)")
            .bind(doi)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
