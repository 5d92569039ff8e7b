//! Grading contract gateway
//!
//! Performs `gradeSubmission(identity, approved)` through a `LedgerClient`
//! and interprets the result. One broadcast per call, never retried: the
//! approved path moves reward tokens.

use async_trait::async_trait;
use l2e_core::logging::operations;
use l2e_core::{LedgerGateway, LedgerOutcome, WalletAddress};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::abi::{describe_revert, encode_grade_submission, parse_address};
use crate::client::{LedgerClient, ThorLedgerClient, TxReceipt};
use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};

/// `LedgerGateway` backed by the grading contract
pub struct ContractGateway<C> {
    client: C,
    contract: [u8; 20],
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl ContractGateway<ThorLedgerClient> {
    /// Build a Thor-backed gateway from configuration
    pub fn from_config(config: &ChainConfig) -> ChainResult<Self> {
        config.validate()?;
        let client = ThorLedgerClient::new(config)?;
        Ok(Self::new(
            client,
            parse_address(&config.contract_address)?,
            config.confirmation_timeout(),
            config.poll_interval(),
        ))
    }
}

impl<C: LedgerClient> ContractGateway<C> {
    pub fn new(
        client: C,
        contract: [u8; 20],
        confirmation_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            contract,
            confirmation_timeout,
            poll_interval,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn contract_address(&self) -> String {
        format!("0x{}", hex::encode(self.contract))
    }

    /// Poll until a receipt appears; transient lookup errors keep polling
    async fn wait_for_receipt(&self, tx_id: &str) -> TxReceipt {
        loop {
            match self.client.receipt(tx_id).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => {
                    debug!(tx_id = %tx_id, operation = operations::AWAIT_RECEIPT, "Receipt pending")
                }
                Err(e) => warn!(
                    tx_id = %tx_id,
                    operation = operations::AWAIT_RECEIPT,
                    error = %e,
                    "Receipt lookup failed, retrying"
                ),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn revert_reason(&self, call_data: &[u8]) -> String {
        match self.client.revert_data(self.contract, call_data).await {
            Ok(outputs) => describe_revert(&outputs),
            Err(e) => {
                debug!(error = %e, "Revert data unavailable");
                describe_revert(&[])
            }
        }
    }
}

#[async_trait]
impl<C: LedgerClient> LedgerGateway for ContractGateway<C> {
    async fn grade_on_chain(&self, identity: &WalletAddress, approved: bool) -> LedgerOutcome {
        let call_data = encode_grade_submission(identity, approved);
        info!(
            identity = %identity,
            approved,
            contract = %self.contract_address(),
            operation = operations::GRADE,
            "Calling gradeSubmission"
        );

        let start = Instant::now();
        let tx_id = match self.client.submit(self.contract, &call_data).await {
            Ok(tx_id) => tx_id,
            Err(ChainError::BroadcastUncertain { tx_id, reason }) => {
                warn!(
                    identity = %identity,
                    tx_id = %tx_id,
                    operation = operations::BROADCAST,
                    error = %reason,
                    "Broadcast outcome unknown; waiting for a receipt under the local id"
                );
                tx_id
            }
            Err(e) => {
                warn!(
                    identity = %identity,
                    operation = operations::BROADCAST,
                    error = %e,
                    "Grading transaction was not submitted"
                );
                return LedgerOutcome::NotSubmitted { reason: e.to_string() };
            }
        };

        let waited =
            tokio::time::timeout(self.confirmation_timeout, self.wait_for_receipt(&tx_id)).await;
        let receipt = match waited {
            Ok(receipt) => receipt,
            Err(_) => {
                let err = ChainError::ConfirmationTimeout {
                    tx_id: tx_id.clone(),
                    waited_secs: self.confirmation_timeout.as_secs(),
                };
                warn!(
                    identity = %identity,
                    tx_id = %tx_id,
                    operation = operations::AWAIT_RECEIPT,
                    "Grading transaction unconfirmed"
                );
                return LedgerOutcome::Unconfirmed {
                    tx_id,
                    reason: err.to_string(),
                };
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        if receipt.reverted {
            let reason = self.revert_reason(&call_data).await;
            warn!(
                identity = %identity,
                tx_id = %tx_id,
                duration_ms,
                reason = %reason,
                "Grading transaction reverted"
            );
            LedgerOutcome::Reverted { tx_id, reason }
        } else {
            info!(
                identity = %identity,
                tx_id = %tx_id,
                block = ?receipt.block_number,
                duration_ms,
                "Grading transaction confirmed"
            );
            LedgerOutcome::Confirmed { tx_id }
        }
    }

    fn signer_address(&self) -> Option<String> {
        Some(self.client.signer_address())
    }
}
