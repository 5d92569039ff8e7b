//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use l2e_core::logging::operations;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        store: state.store.name().to_string(),
        signer_address: state.signer_address.clone(),
    })
}

/// Ready check endpoint (verifies store connectivity)
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            warn!(operation = operations::HEALTH_CHECK, error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: state.version.clone(),
            store: state.store.name().to_string(),
            signer_address: state.signer_address.clone(),
        }),
    )
}
