//! Data Transfer Objects for API requests and responses
//!
//! JSON field names are camelCase.

use chrono::{DateTime, Utc};
use l2e_core::{ApprovedEntry, NewSubmission, Submission, ValidationResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum display name length (characters)
pub const MAX_DISPLAY_NAME_LEN: u64 = 256;

/// Maximum proof reference length (characters)
pub const MAX_PROOF_REFERENCE_LEN: u64 = 2048;

// ============ Submission DTOs ============

/// Create submission request
///
/// Fields are optional here so that absence is reported as a validation
/// error rather than a body rejection.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    /// Wallet address of the participant
    #[serde(alias = "walletAddress")]
    #[validate(required, length(min = 1))]
    pub identity: Option<String>,
    /// Name shown in listings
    #[serde(alias = "name")]
    #[validate(required, length(min = 1, max = 256))]
    pub display_name: Option<String>,
    /// Link to the proof of completion
    #[serde(alias = "proofLink")]
    #[validate(required, length(min = 1, max = 2048))]
    pub proof_reference: Option<String>,
}

impl CreateSubmissionRequest {
    /// Strip surrounding whitespace so blank fields fail `min = 1`
    pub fn trimmed(self) -> Self {
        fn trim(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string())
        }
        Self {
            identity: trim(self.identity),
            display_name: trim(self.display_name),
            proof_reference: trim(self.proof_reference),
        }
    }

    /// Convert a validated request into store input
    pub fn into_new_submission(self) -> ValidationResult<NewSubmission> {
        NewSubmission::new(
            self.identity.as_deref().unwrap_or_default(),
            self.display_name.unwrap_or_default(),
            self.proof_reference.unwrap_or_default(),
        )
    }
}

/// Create submission response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionResponse {
    pub identity: String,
    pub message: String,
}

/// Status of one submission, as seen by its participant
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatusResponse {
    pub submitted: bool,
    pub approved: bool,
    pub claimed: bool,
    pub decision: String,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub transaction_hash: Option<String>,
    pub display_name: String,
    pub proof_reference: String,
}

impl From<&Submission> for SubmissionStatusResponse {
    fn from(s: &Submission) -> Self {
        Self {
            submitted: true,
            approved: s.is_approved(),
            claimed: s.reward_claimed,
            decision: s.decision.to_string(),
            submitted_at: s.submitted_at,
            approved_at: s.decided_at.filter(|_| s.is_approved()),
            decided_at: s.decided_at,
            claimed_at: s.claimed_at,
            transaction_hash: s.ledger_tx_id.clone(),
            display_name: s.display_name.clone(),
            proof_reference: s.proof_reference.clone(),
        }
    }
}

/// Full submission record for moderator listings
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub identity: String,
    pub display_name: String,
    pub proof_reference: String,
    pub submitted: bool,
    pub approved: bool,
    pub claimed: bool,
    pub decision: String,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub moderator_notes: Option<String>,
    pub transaction_hash: Option<String>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        let approved = s.is_approved();
        Self {
            identity: s.identity.to_string(),
            display_name: s.display_name,
            proof_reference: s.proof_reference,
            submitted: true,
            approved,
            claimed: s.reward_claimed,
            decision: s.decision.to_string(),
            submitted_at: s.submitted_at,
            approved_at: s.decided_at.filter(|_| approved),
            decided_at: s.decided_at,
            claimed_at: s.claimed_at,
            moderator_notes: s.moderator_notes,
            transaction_hash: s.ledger_tx_id,
        }
    }
}

/// Approved participant
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedResponse {
    pub identity: String,
    pub display_name: String,
}

impl From<ApprovedEntry> for ApprovedResponse {
    fn from(e: ApprovedEntry) -> Self {
        Self {
            identity: e.identity.to_string(),
            display_name: e.display_name,
        }
    }
}

// ============ Moderation DTOs ============

/// Moderation request body
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateRequest {
    /// true to approve (and distribute rewards), false to reject
    pub approved: Option<bool>,
    pub moderator_notes: Option<String>,
}

/// Moderation response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateResponse {
    pub approved: bool,
    pub tx_id: String,
    pub rewards_distributed: bool,
    pub message: String,
}

// ============ Health DTOs ============

/// Health response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Storage backend name
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}
