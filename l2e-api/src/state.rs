//! Application state for the API server

use l2e_core::{LedgerGateway, SubmissionStore};
use std::sync::Arc;

use crate::services::ModerationWorkflow;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Submission store
    pub store: Arc<dyn SubmissionStore>,
    /// Moderation workflow (owns the ledger gateway and identity locks)
    pub moderation: Arc<ModerationWorkflow>,
    /// Address of the registrar credential, if a gateway exposes it
    pub signer_address: Option<String>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create new app state from a store and a ledger gateway
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn SubmissionStore>,
        gateway: Arc<dyn LedgerGateway>,
    ) -> Self {
        let signer_address = gateway.signer_address();
        let moderation = Arc::new(ModerationWorkflow::new(
            store.clone(),
            gateway,
            config.moderator_key.clone(),
        ));

        Self {
            store,
            moderation,
            signer_address,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Shared secret expected in `x-moderator-key`; empty disables moderation
    pub moderator_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            enable_cors: true,
            moderator_key: String::new(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("enable_cors", &self.enable_cors)
            .field("moderator_key", &"<redacted>")
            .finish()
    }
}
