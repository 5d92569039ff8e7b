//! Submission Store Service Implementation
//!
//! Implements `SubmissionStore` using the SQLite repositories.

use async_trait::async_trait;
use chrono::Utc;
use l2e_core::logging::operations;
use l2e_core::{
    ApprovedEntry, Decision, NewSubmission, StoreError, StoreResult, Submission, SubmissionStore,
    Verdict, WalletAddress,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::entities::SubmissionEntity;
use crate::repos::{FinalizeRow, L2eDatabase};

/// SQLite-backed submission store
pub struct SubmissionService {
    database: Arc<L2eDatabase>,
}

impl SubmissionService {
    pub fn new(database: Arc<L2eDatabase>) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Arc<L2eDatabase> {
        &self.database
    }

    fn to_records(entities: Vec<SubmissionEntity>) -> StoreResult<Vec<Submission>> {
        entities
            .into_iter()
            .map(|e| e.into_record().map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl SubmissionStore for SubmissionService {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, input: NewSubmission) -> StoreResult<Submission> {
        let entity = self
            .database
            .submissions
            .create(
                input.identity.as_str(),
                &input.display_name,
                &input.proof_reference,
                Utc::now(),
            )
            .await?;

        info!(
            identity = %input.identity,
            operation = operations::SUBMIT,
            "Submission recorded"
        );
        Ok(entity.into_record()?)
    }

    async fn get(&self, identity: &WalletAddress) -> StoreResult<Option<Submission>> {
        let entity = self
            .database
            .submissions
            .get_by_identity(identity.as_str())
            .await?;

        entity.map(|e| e.into_record().map_err(StoreError::from)).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Submission>> {
        let entities = self.database.submissions.list_all().await?;
        Self::to_records(entities)
    }

    async fn list_pending(&self) -> StoreResult<Vec<Submission>> {
        let entities = self
            .database
            .submissions
            .list_by_decision(Decision::Pending.as_str())
            .await?;
        Self::to_records(entities)
    }

    async fn list_approved(&self) -> StoreResult<Vec<ApprovedEntry>> {
        let entities = self
            .database
            .submissions
            .list_by_decision(Decision::Approved.as_str())
            .await?;

        Ok(Self::to_records(entities)?
            .into_iter()
            .map(|s| ApprovedEntry {
                identity: s.identity,
                display_name: s.display_name,
            })
            .collect())
    }

    async fn finalize_decision(
        &self,
        identity: &WalletAddress,
        verdict: Verdict,
        moderator_notes: Option<String>,
        ledger_tx_id: Option<String>,
    ) -> StoreResult<Submission> {
        let now = Utc::now();
        let decision: Decision = verdict.into();
        let row = FinalizeRow {
            decision: decision.as_str(),
            decided_at: now,
            moderator_notes: moderator_notes.as_deref(),
            reward_claimed: verdict.is_approved(),
            claimed_at: verdict.is_approved().then_some(now),
            ledger_tx_id: ledger_tx_id.as_deref(),
        };

        let entity = self
            .database
            .submissions
            .finalize(identity.as_str(), row)
            .await?;

        debug!(
            identity = %identity,
            decision = %decision,
            operation = operations::FINALIZE,
            "Decision persisted"
        );
        Ok(entity.into_record()?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.database.health_check().await?;
        Ok(())
    }
}
