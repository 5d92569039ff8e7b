//! Store services
//!
//! Implement the core `SubmissionStore` trait on top of the repositories.

mod submission_service;

pub use submission_service::SubmissionService;

use l2e_core::SubmissionStore;
use std::sync::Arc;

use crate::config::DbConfig;
use crate::error::DbResult;
use crate::memory::MemorySubmissionStore;
use crate::repos::L2eDatabase;

/// Open the store selected by `config.url`, creating the schema if needed
pub async fn open_store(config: &DbConfig) -> DbResult<Arc<dyn SubmissionStore>> {
    if config.is_memory_store() {
        tracing::info!("Using in-memory submission store");
        return Ok(Arc::new(MemorySubmissionStore::new()));
    }

    let database = L2eDatabase::connect(config).await?;
    database.init_schema().await?;
    tracing::info!(url = %config.url, "Using SQLite submission store");
    Ok(Arc::new(SubmissionService::new(Arc::new(database))))
}
