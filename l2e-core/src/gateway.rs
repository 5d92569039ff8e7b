//! Ledger gateway interface

use async_trait::async_trait;

use crate::types::{LedgerOutcome, WalletAddress};

/// Performs the on-chain grading call for one identity
///
/// The call blocks until the network confirms (or the implementation's
/// confirmation bound expires) and never retries on its own: a second
/// submission could transfer the reward twice.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Grade `identity` on-chain; all failures are folded into the outcome
    async fn grade_on_chain(&self, identity: &WalletAddress, approved: bool) -> LedgerOutcome;

    /// Address of the process-held signing credential, if known
    fn signer_address(&self) -> Option<String> {
        None
    }
}
