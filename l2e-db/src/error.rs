//! Database error types

use l2e_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Entity already decided: {0}")]
    AlreadyDecided(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Corrupt row for {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Map a sqlx error, turning unique-constraint violations into `AlreadyExists`
    pub fn from_write(e: sqlx::Error, key: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::AlreadyExists(key.to_string())
            }
            _ => DbError::QueryError(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::QueryError(e.to_string())
    }
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists(key) => StoreError::Duplicate(key),
            DbError::NotFound(key) => StoreError::NotFound(key),
            DbError::AlreadyDecided(key) => StoreError::AlreadyDecided(key),
            DbError::Corrupt { key, reason } => StoreError::Corrupt {
                identity: key,
                reason,
            },
            other => StoreError::Backend(other.to_string()),
        }
    }
}
