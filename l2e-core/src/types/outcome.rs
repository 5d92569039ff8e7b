//! Interpreted result of an on-chain grading call

use serde::{Deserialize, Serialize};

/// Outcome of `LedgerGateway::grade_on_chain`
///
/// Only `Confirmed` counts as success. Every other variant leaves the
/// submission pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LedgerOutcome {
    /// Receipt shows the call was not reverted
    Confirmed { tx_id: String },
    /// Receipt shows the call was reverted
    Reverted { tx_id: String, reason: String },
    /// Broadcast succeeded but no receipt arrived in time; the on-chain
    /// outcome is unknown
    Unconfirmed { tx_id: String, reason: String },
    /// Signing or submission failed before a transaction id existed
    NotSubmitted { reason: String },
}

impl LedgerOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LedgerOutcome::Confirmed { .. })
    }

    /// Transaction id, if one was obtained
    pub fn tx_id(&self) -> Option<&str> {
        match self {
            LedgerOutcome::Confirmed { tx_id }
            | LedgerOutcome::Reverted { tx_id, .. }
            | LedgerOutcome::Unconfirmed { tx_id, .. } => Some(tx_id),
            LedgerOutcome::NotSubmitted { .. } => None,
        }
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            LedgerOutcome::Confirmed { .. } => None,
            LedgerOutcome::Reverted { reason, .. }
            | LedgerOutcome::Unconfirmed { reason, .. }
            | LedgerOutcome::NotSubmitted { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_confirmed_is_success() {
        let ok = LedgerOutcome::Confirmed { tx_id: "0x1".into() };
        assert!(ok.is_success());
        assert_eq!(ok.tx_id(), Some("0x1"));
        assert_eq!(ok.reason(), None);

        let reverted = LedgerOutcome::Reverted {
            tx_id: "0x2".into(),
            reason: "Transaction was reverted".into(),
        };
        assert!(!reverted.is_success());
        assert_eq!(reverted.tx_id(), Some("0x2"));

        let unsent = LedgerOutcome::NotSubmitted { reason: "offline".into() };
        assert!(!unsent.is_success());
        assert_eq!(unsent.tx_id(), None);
        assert_eq!(unsent.reason(), Some("offline"));
    }
}
