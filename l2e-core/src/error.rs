//! Error types for Learn2Earn core

use thiserror::Error;

/// Input validation errors (no side effects are ever performed)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),
}

/// Submission store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Submission already exists for {0}")]
    Duplicate(String),

    #[error("Submission not found: {0}")]
    NotFound(String),

    #[error("Submission already decided: {0}")]
    AlreadyDecided(String),

    #[error("Corrupt record for {identity}: {reason}")]
    Corrupt { identity: String, reason: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Wrap any backend error
    pub fn backend(e: impl std::fmt::Display) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Result type alias for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
