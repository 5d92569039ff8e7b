//! Moderation endpoint

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use l2e_core::ValidationError;

use crate::dto::{ModerateRequest, ModerateResponse};
use crate::error::ApiResult;
use crate::services::ModerationRequest;
use crate::state::AppState;

/// Header carrying the moderator key
pub const MODERATOR_KEY_HEADER: &str = "x-moderator-key";

/// Approve or reject a submission
///
/// Approval grades the submission on-chain, which distributes the reward.
/// The key is checked before the body so that an unauthorized caller
/// learns nothing about the request's validity.
pub async fn moderate_submission(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ModerateRequest>, JsonRejection>,
) -> ApiResult<Json<ModerateResponse>> {
    let moderator_key = headers
        .get(MODERATOR_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.moderation.authorize(moderator_key.as_deref())?;

    let Json(req) = payload?;
    let approved = req
        .approved
        .ok_or(ValidationError::MissingField("approved"))?;

    let receipt = state
        .moderation
        .moderate(ModerationRequest {
            identity,
            approved,
            moderator_notes: req.moderator_notes,
            moderator_key,
        })
        .await?;

    let approved = receipt.approved();
    Ok(Json(ModerateResponse {
        approved,
        tx_id: receipt.tx_id,
        rewards_distributed: approved,
        message: if approved {
            "Submission approved and rewards distributed automatically!".to_string()
        } else {
            "Submission rejected".to_string()
        },
    }))
}
