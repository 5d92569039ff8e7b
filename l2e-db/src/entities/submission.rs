//! Submission entity stored in SQLite

use chrono::{DateTime, SecondsFormat, Utc};
use l2e_core::{Decision, Submission, WalletAddress};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// Row of the `submissions` table
///
/// Timestamps are stored as fixed-width RFC 3339 strings (microseconds,
/// `Z` suffix) so that lexical order matches chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubmissionEntity {
    /// Row id, used as an ordering tie-breaker
    pub id: i64,
    /// Canonical wallet address (unique)
    pub identity: String,
    pub display_name: String,
    pub proof_reference: String,
    pub submitted_at: String,
    /// pending, approved, rejected
    pub decision: String,
    pub decided_at: Option<String>,
    pub moderator_notes: Option<String>,
    pub reward_claimed: bool,
    pub claimed_at: Option<String>,
    pub ledger_tx_id: Option<String>,
}

/// Format a timestamp for storage
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(key: &str, field: &str, value: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::Corrupt {
            key: key.to_string(),
            reason: format!("{}: {}", field, e),
        })
}

fn parse_optional(key: &str, field: &str, value: Option<&str>) -> DbResult<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(key, field, v)).transpose()
}

impl SubmissionEntity {
    /// Convert to the domain record
    pub fn into_record(self) -> DbResult<Submission> {
        let key = self.identity.clone();
        let identity = WalletAddress::parse(&self.identity).map_err(|e| DbError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        let decision = Decision::parse(&self.decision).ok_or_else(|| DbError::Corrupt {
            key: key.clone(),
            reason: format!("unknown decision '{}'", self.decision),
        })?;

        Ok(Submission {
            identity,
            display_name: self.display_name,
            proof_reference: self.proof_reference,
            submitted_at: parse_timestamp(&key, "submitted_at", &self.submitted_at)?,
            decision,
            decided_at: parse_optional(&key, "decided_at", self.decided_at.as_deref())?,
            moderator_notes: self.moderator_notes,
            reward_claimed: self.reward_claimed,
            claimed_at: parse_optional(&key, "claimed_at", self.claimed_at.as_deref())?,
            ledger_tx_id: self.ledger_tx_id,
        })
    }
}
