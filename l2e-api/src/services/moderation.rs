//! Moderation workflow
//!
//! Couples the on-chain grading call with the one-time store update:
//!
//! 1. authorize the moderator key (constant time)
//! 2. under the identity lock, require an existing pending submission
//! 3. grade on-chain; any failure stops here with the store untouched
//! 4. record the decision with the ledger transaction id
//!
//! Steps 2-4 run on a spawned task, so a caller that goes away after
//! authorization (client disconnect, request timeout) cannot stop the
//! sequence between the ledger call and the commit.
//!
//! A failure in step 4 after a confirmed grading call is a chain/store
//! divergence. It is logged at ERROR and returned, never swallowed.

use l2e_core::logging::operations;
use l2e_core::{
    LedgerGateway, LedgerOutcome, StoreError, Submission, SubmissionStore, ValidationError,
    Verdict, WalletAddress,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{error, info, warn};

use super::identity_lock::IdentityLocks;

/// Moderation errors
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No submission found for {0}")]
    NotFound(String),

    #[error("Submission for {0} has already been decided")]
    AlreadyDecided(String),

    #[error("Failed to process on blockchain: {reason}")]
    LedgerFailure {
        reason: String,
        tx_id: Option<String>,
    },

    #[error("Moderation task failed: {0}")]
    TaskFailed(String),

    #[error("{}", store_failure_message(.tx_id, .reason))]
    StoreFailure {
        reason: String,
        tx_id: Option<String>,
    },
}

fn store_failure_message(tx_id: &Option<String>, reason: &str) -> String {
    match tx_id {
        Some(tx_id) => format!(
            "Ledger transaction {} succeeded but the decision was not recorded: {}",
            tx_id, reason
        ),
        None => format!("Submission store failure: {}", reason),
    }
}

/// Result type for moderation
pub type ModerationResult<T> = Result<T, ModerationError>;

/// One moderation request as received
#[derive(Debug, Clone)]
pub struct ModerationRequest {
    /// Identity as supplied by the caller (not yet canonical)
    pub identity: String,
    pub approved: bool,
    pub moderator_notes: Option<String>,
    /// Key presented by the caller, if any
    pub moderator_key: Option<String>,
}

/// Successful moderation
#[derive(Debug, Clone)]
pub struct ModerationReceipt {
    pub submission: Submission,
    pub tx_id: String,
}

impl ModerationReceipt {
    pub fn approved(&self) -> bool {
        self.submission.is_approved()
    }
}

/// Runs the authorize → grade → commit sequence
pub struct ModerationWorkflow {
    store: Arc<dyn SubmissionStore>,
    gateway: Arc<dyn LedgerGateway>,
    moderator_key: String,
    locks: IdentityLocks,
}

impl ModerationWorkflow {
    /// An empty `moderator_key` rejects every request
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        gateway: Arc<dyn LedgerGateway>,
        moderator_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            moderator_key: moderator_key.into(),
            locks: IdentityLocks::new(),
        }
    }

    pub fn locks(&self) -> &IdentityLocks {
        &self.locks
    }

    /// Constant-time comparison of the presented key with the configured one
    pub fn authorize(&self, presented: Option<&str>) -> ModerationResult<()> {
        let presented = presented.unwrap_or_default();
        let matches: bool = presented
            .as_bytes()
            .ct_eq(self.moderator_key.as_bytes())
            .into();

        if self.moderator_key.is_empty() || !matches {
            warn!(operation = operations::AUTHORIZE, "Moderation rejected: bad or missing key");
            return Err(ModerationError::Unauthorized);
        }
        Ok(())
    }

    /// Moderate one submission
    pub async fn moderate(
        &self,
        request: ModerationRequest,
    ) -> ModerationResult<ModerationReceipt> {
        self.authorize(request.moderator_key.as_deref())?;

        let identity = WalletAddress::parse(&request.identity)?;
        let notes = request
            .moderator_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let task = DecisionTask {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            locks: self.locks.clone(),
            identity,
            verdict: Verdict::from_approved(request.approved),
            notes,
        };

        // Dropping the JoinHandle detaches the task; it still runs to completion
        tokio::spawn(task.run()).await.map_err(|e| {
            error!(operation = operations::GRADE, error = %e, "Moderation task did not complete");
            ModerationError::TaskFailed(e.to_string())
        })?
    }
}

/// Lookup, ledger call and commit for one identity
struct DecisionTask {
    store: Arc<dyn SubmissionStore>,
    gateway: Arc<dyn LedgerGateway>,
    locks: IdentityLocks,
    identity: WalletAddress,
    verdict: Verdict,
    notes: Option<String>,
}

impl DecisionTask {
    async fn run(self) -> ModerationResult<ModerationReceipt> {
        let identity = self.identity;
        let approved = self.verdict.is_approved();
        let _guard = self.locks.acquire(&identity).await;

        let current = self
            .store
            .get(&identity)
            .await
            .map_err(|e| ModerationError::StoreFailure {
                reason: e.to_string(),
                tx_id: None,
            })?
            .ok_or_else(|| ModerationError::NotFound(identity.to_string()))?;
        if !current.decision.is_pending() {
            return Err(ModerationError::AlreadyDecided(identity.to_string()));
        }

        info!(
            identity = %identity,
            approved,
            operation = operations::GRADE,
            "Grading submission on-chain"
        );
        let outcome = self.gateway.grade_on_chain(&identity, approved).await;
        let tx_id = match outcome {
            LedgerOutcome::Confirmed { tx_id } => tx_id,
            failed => {
                let reason = failed.reason().unwrap_or("unknown ledger failure").to_string();
                warn!(
                    identity = %identity,
                    tx_id = ?failed.tx_id(),
                    operation = operations::GRADE,
                    error = %reason,
                    "Grading failed; submission remains pending"
                );
                return Err(ModerationError::LedgerFailure {
                    tx_id: failed.tx_id().map(str::to_string),
                    reason,
                });
            }
        };

        match self
            .store
            .finalize_decision(&identity, self.verdict, self.notes, Some(tx_id.clone()))
            .await
        {
            Ok(submission) => {
                info!(
                    identity = %identity,
                    tx_id = %tx_id,
                    decision = %submission.decision,
                    operation = operations::FINALIZE,
                    "Decision recorded"
                );
                Ok(ModerationReceipt { submission, tx_id })
            }
            Err(e) => {
                error!(
                    identity = %identity,
                    tx_id = %tx_id,
                    operation = operations::FINALIZE,
                    error = %e,
                    "Ledger confirmed but store finalize failed; manual reconciliation required"
                );
                Err(ModerationError::StoreFailure {
                    reason: describe_store_error(&e),
                    tx_id: Some(tx_id),
                })
            }
        }
    }
}

fn describe_store_error(e: &StoreError) -> String {
    match e {
        StoreError::AlreadyDecided(_) => "record was decided concurrently".to_string(),
        other => other.to_string(),
    }
}
