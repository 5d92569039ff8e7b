//! In-memory submission store
//!
//! Used for tests and development. Uniqueness and the pending-only
//! finalize rule are enforced under a single write lock.

use async_trait::async_trait;
use chrono::Utc;
use l2e_core::logging::operations;
use l2e_core::{
    ApprovedEntry, NewSubmission, StoreError, StoreResult, Submission, SubmissionStore, Verdict,
    WalletAddress,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Stored record plus insertion order (ordering tie-breaker)
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    submission: Submission,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    by_identity: HashMap<WalletAddress, Slot>,
}

/// Thread-safe in-memory store
#[derive(Debug, Default, Clone)]
pub struct MemorySubmissionStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored submissions
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_identity.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn sorted(&self, newest_first: bool) -> Vec<Slot> {
        let inner = self.inner.read().await;
        let mut slots: Vec<Slot> = inner.by_identity.values().cloned().collect();
        slots.sort_by(|a, b| {
            (a.submission.submitted_at, a.seq).cmp(&(b.submission.submitted_at, b.seq))
        });
        if newest_first {
            slots.reverse();
        }
        slots
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, input: NewSubmission) -> StoreResult<Submission> {
        let mut inner = self.inner.write().await;
        if inner.by_identity.contains_key(&input.identity) {
            return Err(StoreError::Duplicate(input.identity.to_string()));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;

        let identity = input.identity.clone();
        let submission = Submission::new(input, Utc::now());
        inner.by_identity.insert(
            identity.clone(),
            Slot {
                seq,
                submission: submission.clone(),
            },
        );

        info!(identity = %identity, operation = operations::SUBMIT, "Submission recorded");
        Ok(submission)
    }

    async fn get(&self, identity: &WalletAddress) -> StoreResult<Option<Submission>> {
        let inner = self.inner.read().await;
        Ok(inner.by_identity.get(identity).map(|s| s.submission.clone()))
    }

    async fn list_all(&self) -> StoreResult<Vec<Submission>> {
        Ok(self.sorted(true).await.into_iter().map(|s| s.submission).collect())
    }

    async fn list_pending(&self) -> StoreResult<Vec<Submission>> {
        Ok(self
            .sorted(false)
            .await
            .into_iter()
            .map(|s| s.submission)
            .filter(|s| s.decision.is_pending())
            .collect())
    }

    async fn list_approved(&self) -> StoreResult<Vec<ApprovedEntry>> {
        Ok(self
            .sorted(false)
            .await
            .into_iter()
            .map(|s| s.submission)
            .filter(Submission::is_approved)
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
        let mut inner = self.inner.write().await;
        let slot = inner
            .by_identity
            .get_mut(identity)
            .ok_or_else(|| StoreError::NotFound(identity.to_string()))?;

        if !slot.submission.decision.is_pending() {
            return Err(StoreError::AlreadyDecided(identity.to_string()));
        }

        slot.submission
            .apply_verdict(verdict, moderator_notes, ledger_tx_id, Utc::now());
        Ok(slot.submission.clone())
    }
}
