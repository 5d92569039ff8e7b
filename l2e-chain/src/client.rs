//! Ledger client abstraction
//!
//! `LedgerClient` is the seam between the grading gateway and the node:
//! sign and broadcast one contract call, poll its receipt, and fetch revert
//! data. `ThorLedgerClient` is the VeChainThor implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::signer::LocalSigner;
use crate::thor::{decode_hex, SimulatedClause, ThorClient};
use crate::tx_builder::{Clause, TxBody};

/// Settled transaction receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub reverted: bool,
    pub block_number: Option<u64>,
}

/// Contract-call submission and receipt lookup
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Address transactions are sent from
    fn signer_address(&self) -> String;

    /// Sign and broadcast a single-clause call, returning the transaction id
    async fn submit(&self, contract: [u8; 20], call_data: &[u8]) -> ChainResult<String>;

    /// Receipt for a transaction, `None` while pending
    async fn receipt(&self, tx_id: &str) -> ChainResult<Option<TxReceipt>>;

    /// Revert payloads observed when re-executing the call
    async fn revert_data(&self, contract: [u8; 20], call_data: &[u8]) -> ChainResult<Vec<Vec<u8>>>;
}

/// VeChainThor ledger client
pub struct ThorLedgerClient {
    thor: ThorClient,
    signer: LocalSigner,
    gas_limit: u64,
    expiration_blocks: u32,
}

impl ThorLedgerClient {
    /// Create a client from configuration; requires a private key
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        let key = config
            .private_key
            .as_deref()
            .ok_or_else(|| ChainError::Configuration("private_key is not set".into()))?;
        let signer = LocalSigner::from_hex(key)?;

        Ok(Self {
            thor: ThorClient::new(config)?,
            signer,
            gas_limit: config.gas_limit,
            expiration_blocks: config.expiration_blocks,
        })
    }

    pub fn thor(&self) -> &ThorClient {
        &self.thor
    }
}

#[async_trait]
impl LedgerClient for ThorLedgerClient {
    fn signer_address(&self) -> String {
        self.signer.address_hex()
    }

    async fn submit(&self, contract: [u8; 20], call_data: &[u8]) -> ChainResult<String> {
        let chain_tag = self.thor.chain_tag().await?;
        let best = self.thor.best_block().await?;

        let body = TxBody {
            chain_tag,
            block_ref: best.block_ref()?,
            expiration: self.expiration_blocks,
            clauses: vec![Clause::call(contract, call_data.to_vec())],
            gas_price_coef: 0,
            gas: self.gas_limit,
            depends_on: None,
            nonce: rand::random::<u64>(),
        };
        debug!(
            chain_tag,
            block_number = best.number,
            gas = self.gas_limit,
            "Transaction body built"
        );

        let signed = body.sign(&self.signer)?;
        let tx_id = self
            .thor
            .send_raw(&signed.raw_hex())
            .await
            .map_err(|e| classify_broadcast_error(e, signed.id_hex()))?;

        if !tx_id.eq_ignore_ascii_case(&signed.id_hex()) {
            debug!(
                local = %signed.id_hex(),
                node = %tx_id,
                "Node returned a different transaction id"
            );
        }
        info!(tx_id = %tx_id, "Transaction broadcast");
        Ok(tx_id)
    }

    async fn receipt(&self, tx_id: &str) -> ChainResult<Option<TxReceipt>> {
        Ok(self.thor.receipt(tx_id).await?.map(|r| TxReceipt {
            reverted: r.reverted,
            block_number: r.meta.map(|m| m.block_number),
        }))
    }

    async fn revert_data(&self, contract: [u8; 20], call_data: &[u8]) -> ChainResult<Vec<Vec<u8>>> {
        let clause = SimulatedClause {
            to: format!("0x{}", hex::encode(contract)),
            value: "0x0".to_string(),
            data: format!("0x{}", hex::encode(call_data)),
        };
        let outputs = self
            .thor
            .simulate(&[clause], &self.signer_address(), self.gas_limit)
            .await?;

        outputs
            .into_iter()
            .filter(|o| o.reverted)
            .map(|o| decode_hex(&o.data))
            .collect()
    }
}

/// Split broadcast failures into "not sent" and "maybe sent"
///
/// A refused connection or an explicit node rejection means the
/// transaction was not accepted. Anything else (timeout, reset, unreadable
/// 2xx body) may have reached the node, so the locally computed id is kept
/// for receipt lookup.
fn classify_broadcast_error(err: ChainError, local_tx_id: String) -> ChainError {
    match err {
        ChainError::RpcConnection(_) | ChainError::TransactionBroadcast(_) => err,
        other => ChainError::BroadcastUncertain {
            tx_id: local_tx_id,
            reason: other.to_string(),
        },
    }
}
