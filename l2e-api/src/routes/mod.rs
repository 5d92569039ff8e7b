//! API route handlers

pub mod health;
pub mod moderation;
pub mod submission;

use axum::{routing::get, routing::post, routing::put, Router};

use crate::state::AppState;

/// Versioned submission routes
fn api_v1() -> Router<AppState> {
    Router::new()
        .route(
            "/submissions",
            post(submission::create_submission).get(submission::list_submissions),
        )
        .route("/submissions/approved", get(submission::list_approved))
        .route("/submissions/pending", get(submission::list_pending))
        .route("/submissions/:identity", get(submission::get_submission))
        .route("/submissions/:identity/approve", put(moderation::moderate_submission))
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .nest("/api/v1", api_v1())
        // State
        .with_state(state)
}
