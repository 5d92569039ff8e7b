//! Submission store interface

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{ApprovedEntry, NewSubmission, Submission, Verdict, WalletAddress};

/// Durable record of one submission per identity
///
/// Implementations must make `create` atomic with its uniqueness check and
/// must only let `finalize_decision` succeed on a pending record.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Insert a pending submission; fails with `Duplicate` if one exists
    async fn create(&self, input: NewSubmission) -> StoreResult<Submission>;

    /// Fetch a submission by identity
    async fn get(&self, identity: &WalletAddress) -> StoreResult<Option<Submission>>;

    /// All submissions, newest first
    async fn list_all(&self) -> StoreResult<Vec<Submission>>;

    /// Pending submissions, oldest first
    async fn list_pending(&self) -> StoreResult<Vec<Submission>>;

    /// Identity and display name of every approved submission
    async fn list_approved(&self) -> StoreResult<Vec<ApprovedEntry>>;

    /// Record the one-time decision
    ///
    /// Fails with `NotFound` for an unknown identity and `AlreadyDecided`
    /// when the record has left `Pending`.
    async fn finalize_decision(
        &self,
        identity: &WalletAddress,
        verdict: Verdict,
        moderator_notes: Option<String>,
        ledger_tx_id: Option<String>,
    ) -> StoreResult<Submission>;

    /// Verify backend connectivity
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
