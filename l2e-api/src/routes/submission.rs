//! Submission endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use l2e_core::WalletAddress;
use validator::Validate;

use crate::dto::{
    ApprovedResponse, CreateSubmissionRequest, CreateSubmissionResponse, SubmissionResponse,
    SubmissionStatusResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Record a proof-of-completion submission
pub async fn create_submission(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateSubmissionResponse>)> {
    let Json(req) = payload?;
    let req = req.trimmed();
    req.validate()?;

    let input = req.into_new_submission()?;

    let record = state.store.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            identity: record.identity.to_string(),
            message: "Submission received successfully".to_string(),
        }),
    ))
}

/// Get submission status by identity
pub async fn get_submission(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> ApiResult<Json<SubmissionStatusResponse>> {
    let identity = WalletAddress::parse(&identity)?;

    let record = state
        .store
        .get(&identity)
        .await?
        .ok_or_else(|| ApiError::NotFound("No submission found".to_string()))?;

    Ok(Json(SubmissionStatusResponse::from(&record)))
}

/// All submissions, newest first
pub async fn list_submissions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let records = state.store.list_all().await?;
    Ok(Json(records.into_iter().map(SubmissionResponse::from).collect()))
}

/// Moderation queue, oldest first
pub async fn list_pending(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let records = state.store.list_pending().await?;
    Ok(Json(records.into_iter().map(SubmissionResponse::from).collect()))
}

/// Approved participants
pub async fn list_approved(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApprovedResponse>>> {
    let entries = state.store.list_approved().await?;
    Ok(Json(entries.into_iter().map(ApprovedResponse::from).collect()))
}
