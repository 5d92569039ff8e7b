//! Submission repository implementation

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;

use crate::entities::{format_timestamp, SubmissionEntity};
use crate::error::{DbError, DbResult};

/// Submission Repository
pub struct SubmissionRepo {
    pool: SqlitePool,
}

/// Fields written by a finalize
#[derive(Debug, Clone)]
pub struct FinalizeRow<'a> {
    pub decision: &'a str,
    pub decided_at: DateTime<Utc>,
    pub moderator_notes: Option<&'a str>,
    pub reward_claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    pub ledger_tx_id: Option<&'a str>,
}

impl SubmissionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending submission
    ///
    /// The `UNIQUE` constraint on `identity` makes the uniqueness check and
    /// the insert a single atomic step.
    pub async fn create(
        &self,
        identity: &str,
        display_name: &str,
        proof_reference: &str,
        submitted_at: DateTime<Utc>,
    ) -> DbResult<SubmissionEntity> {
        sqlx::query_as::<_, SubmissionEntity>(
            "INSERT INTO submissions \
             (identity, display_name, proof_reference, submitted_at, decision) \
             VALUES (?1, ?2, ?3, ?4, 'pending') RETURNING *",
        )
        .bind(identity)
        .bind(display_name)
        .bind(proof_reference)
        .bind(format_timestamp(submitted_at))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, identity))
    }

    /// Get submission by identity
    pub async fn get_by_identity(&self, identity: &str) -> DbResult<Option<SubmissionEntity>> {
        let row = sqlx::query_as::<_, SubmissionEntity>(
            "SELECT * FROM submissions WHERE identity = ?1 LIMIT 1",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List all submissions, newest first
    pub async fn list_all(&self) -> DbResult<Vec<SubmissionEntity>> {
        let rows = sqlx::query_as::<_, SubmissionEntity>(
            "SELECT * FROM submissions ORDER BY submitted_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List submissions with the given decision, oldest first
    pub async fn list_by_decision(&self, decision: &str) -> DbResult<Vec<SubmissionEntity>> {
        let rows = sqlx::query_as::<_, SubmissionEntity>(
            "SELECT * FROM submissions WHERE decision = ?1 ORDER BY submitted_at ASC, id ASC",
        )
        .bind(decision)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Apply the decision to a pending row
    ///
    /// The `decision = 'pending'` guard makes this a compare-and-set: a
    /// decided row is never rewritten, so `ledger_tx_id` cannot change
    /// once set.
    pub async fn finalize(
        &self,
        identity: &str,
        row: FinalizeRow<'_>,
    ) -> DbResult<SubmissionEntity> {
        let updated = sqlx::query_as::<_, SubmissionEntity>(
            "UPDATE submissions SET \
                decision = ?1, \
                decided_at = ?2, \
                moderator_notes = ?3, \
                reward_claimed = ?4, \
                claimed_at = ?5, \
                ledger_tx_id = COALESCE(ledger_tx_id, ?6) \
             WHERE identity = ?7 AND decision = 'pending' \
             RETURNING *",
        )
        .bind(row.decision)
        .bind(format_timestamp(row.decided_at))
        .bind(row.moderator_notes)
        .bind(row.reward_claimed)
        .bind(row.claimed_at.map(format_timestamp))
        .bind(row.ledger_tx_id)
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(entity) => Ok(entity),
            None => match self.get_by_identity(identity).await? {
                Some(_) => Err(DbError::AlreadyDecided(identity.to_string())),
                None => Err(DbError::NotFound(identity.to_string())),
            },
        }
    }

    /// Count submissions
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
