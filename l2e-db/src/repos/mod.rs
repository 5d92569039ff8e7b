//! Repository implementations
//!
//! Implements storage operations on a `sqlx` SQLite pool.

mod submission_repo;

pub use submission_repo::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};

/// Database service - main entry point for storage operations
pub struct L2eDatabase {
    pool: SqlitePool,
    pub submissions: SubmissionRepo,
}

impl L2eDatabase {
    /// Create a database over an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            submissions: SubmissionRepo::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool for the configured URL
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Connection(e.to_string()))?
            .create_if_missing(true);

        // An in-memory database exists per connection; keep exactly one alive
        let pool_options = if config.is_sqlite_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        tracing::debug!(url = %config.url, "Connected to submission database");
        Ok(Self::new(pool))
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize schema in the database
    pub async fn init_schema(&self) -> DbResult<()> {
        for statement in crate::schema::L2E_SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::SchemaError(e.to_string()))?;
        }
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> DbResult<bool> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| DbError::Connection(e.to_string()))
    }
}
