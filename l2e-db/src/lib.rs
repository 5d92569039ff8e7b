//! Learn2Earn Database Layer
//!
//! Storage for submissions, implementing `l2e_core::SubmissionStore`.
//!
//! Two backends are provided:
//! - `SubmissionService` - SQLite via `sqlx`; uniqueness is a storage-level
//!   `UNIQUE` constraint and finalization is a single conditional update
//! - `MemorySubmissionStore` - in-process map for tests and development
//!
//! # Usage
//!
//! ```ignore
//! use l2e_db::{DbConfig, L2eDatabase, SubmissionService};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let database = Arc::new(L2eDatabase::connect(&DbConfig::in_memory()).await.unwrap());
//!     database.init_schema().await.unwrap();
//!     let store = SubmissionService::new(database);
//! }
//! ```

pub mod config;
pub mod entities;
pub mod error;
pub mod memory;
pub mod repos;
pub mod schema;
pub mod services;

pub use config::DbConfig;
pub use entities::*;
pub use error::*;
pub use memory::MemorySubmissionStore;
pub use repos::*;
pub use schema::L2E_SCHEMA;
pub use services::{open_store, SubmissionService};
