//! Submission types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::WalletAddress;
use crate::error::ValidationResult;

/// Moderation decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Awaiting moderation
    Pending,
    /// Approved and graded on-chain
    Approved,
    /// Rejected and graded on-chain
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Pending => "pending",
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    /// Parse from the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Decision::Pending),
            "approved" => Some(Decision::Approved),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Decision::Pending)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal moderation outcome
///
/// Finalizing a submission only ever moves it out of `Pending`, so the
/// finalize path takes a `Verdict` rather than a `Decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Verdict::Approved
        } else {
            Verdict::Rejected
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved)
    }
}

impl From<Verdict> for Decision {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Approved => Decision::Approved,
            Verdict::Rejected => Decision::Rejected,
        }
    }
}

/// Input for a new submission
///
/// Field contents (presence, length) are validated at the API boundary;
/// construction only canonicalizes the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub identity: WalletAddress,
    pub display_name: String,
    pub proof_reference: String,
}

impl NewSubmission {
    pub fn new(
        identity: &str,
        display_name: impl Into<String>,
        proof_reference: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            identity: WalletAddress::parse(identity)?,
            display_name: display_name.into(),
            proof_reference: proof_reference.into(),
        })
    }
}

/// Submission record (one per identity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub identity: WalletAddress,
    pub display_name: String,
    pub proof_reference: String,
    pub submitted_at: DateTime<Utc>,
    pub decision: Decision,
    pub decided_at: Option<DateTime<Utc>>,
    pub moderator_notes: Option<String>,
    /// True only when approved and the ledger call succeeded
    pub reward_claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    pub ledger_tx_id: Option<String>,
}

impl Submission {
    /// Create a fresh pending record
    pub fn new(input: NewSubmission, submitted_at: DateTime<Utc>) -> Self {
        Self {
            identity: input.identity,
            display_name: input.display_name,
            proof_reference: input.proof_reference,
            submitted_at,
            decision: Decision::Pending,
            decided_at: None,
            moderator_notes: None,
            reward_claimed: false,
            claimed_at: None,
            ledger_tx_id: None,
        }
    }

    /// Apply the one-time decision. Callers must check `decision` first.
    pub fn apply_verdict(
        &mut self,
        verdict: Verdict,
        moderator_notes: Option<String>,
        ledger_tx_id: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.decision = verdict.into();
        self.decided_at = Some(now);
        self.moderator_notes = moderator_notes;
        if self.ledger_tx_id.is_none() {
            self.ledger_tx_id = ledger_tx_id;
        }
        if verdict.is_approved() {
            self.reward_claimed = true;
            self.claimed_at = Some(now);
        }
    }

    pub fn is_approved(&self) -> bool {
        self.decision == Decision::Approved
    }
}

/// Public listing entry for approved participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedEntry {
    pub identity: WalletAddress,
    pub display_name: String,
}
