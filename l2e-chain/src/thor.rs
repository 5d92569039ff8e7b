//! VeChainThor REST Client
//!
//! Thin wrapper over the node's HTTP API: block references, transaction
//! broadcast, receipts and read-only clause simulation.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};

/// Block summary
#[derive(Debug, Clone, Deserialize)]
pub struct BlockInfo {
    /// Block id (0x-prefixed, 32 bytes)
    pub id: String,
    /// Block number
    pub number: u64,
}

impl BlockInfo {
    /// First 8 bytes of the block id
    pub fn block_ref(&self) -> ChainResult<[u8; 8]> {
        let bytes = decode_hex(&self.id)?;
        let head = bytes
            .get(..8)
            .ok_or_else(|| ChainError::RpcRequest(format!("short block id {}", self.id)))?;
        let mut block_ref = [0u8; 8];
        block_ref.copy_from_slice(head);
        Ok(block_ref)
    }

    /// Last byte of the block id (chain tag when this is the genesis block)
    pub fn last_byte(&self) -> ChainResult<u8> {
        decode_hex(&self.id)?
            .last()
            .copied()
            .ok_or_else(|| ChainError::RpcRequest("empty block id".into()))
    }
}

/// Receipt metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptMeta {
    #[serde(rename = "blockID")]
    pub block_id: String,
    pub block_number: u64,
}

/// Transaction receipt as returned by the node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThorReceipt {
    pub reverted: bool,
    #[serde(default)]
    pub gas_used: u64,
    pub meta: Option<ReceiptMeta>,
}

/// Clause in a simulation request
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedClause {
    pub to: String,
    pub value: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
struct SimulationRequest<'a> {
    clauses: &'a [SimulatedClause],
    caller: &'a str,
    gas: u64,
}

/// Result of simulating one clause
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    #[serde(default)]
    pub data: String,
    pub reverted: bool,
    #[serde(default)]
    pub vm_error: String,
}

#[derive(Debug, Serialize)]
struct RawTxRequest<'a> {
    raw: &'a str,
}

#[derive(Debug, Deserialize)]
struct TxIdResponse {
    id: String,
}

/// HTTP client for a Thor node
pub struct ThorClient {
    client: Client,
    base_url: String,
    chain_tag: OnceCell<u8>,
}

impl ThorClient {
    /// Create a new client
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ChainError::RpcConnection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            chain_tag: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> ChainResult<T> {
        debug!("Thor GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ChainError::RpcConnection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::RpcRequest(format!("HTTP {} - {}", status, body.trim())));
        }

        response
            .json()
            .await
            .map_err(|e| ChainError::RpcRequest(e.to_string()))
    }

    /// Current best block
    pub async fn best_block(&self) -> ChainResult<BlockInfo> {
        self.get_json("/blocks/best").await
    }

    /// Chain tag (cached after the first lookup)
    pub async fn chain_tag(&self) -> ChainResult<u8> {
        self.chain_tag
            .get_or_try_init(|| async {
                let genesis: BlockInfo = self.get_json("/blocks/0").await?;
                genesis.last_byte()
            })
            .await
            .copied()
    }

    /// Broadcast a signed transaction, returning its id
    pub async fn send_raw(&self, raw_hex: &str) -> ChainResult<String> {
        debug!("Thor POST /transactions");
        let response = self
            .client
            .post(self.url("/transactions"))
            .json(&RawTxRequest { raw: raw_hex })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChainError::RpcConnection(e.to_string())
                } else {
                    // request may have been written before the failure
                    ChainError::RpcRequest(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::TransactionBroadcast(format!(
                "HTTP {} - {}",
                status,
                body.trim()
            )));
        }

        let parsed: TxIdResponse = response.json().await.map_err(|e| {
            ChainError::RpcRequest(format!("unreadable broadcast response: {}", e))
        })?;
        Ok(parsed.id)
    }

    /// Receipt for a transaction, `None` while it is not yet packed
    pub async fn receipt(&self, tx_id: &str) -> ChainResult<Option<ThorReceipt>> {
        self.get_json(&format!("/transactions/{}/receipt", tx_id)).await
    }

    /// Execute clauses against the best block without committing
    pub async fn simulate(
        &self,
        clauses: &[SimulatedClause],
        caller: &str,
        gas: u64,
    ) -> ChainResult<Vec<SimulationOutput>> {
        let response = self
            .client
            .post(self.url("/accounts/*"))
            .json(&SimulationRequest { clauses, caller, gas })
            .send()
            .await
            .map_err(|e| ChainError::RpcConnection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Thor simulation failed: HTTP {}", status);
            return Err(ChainError::RpcRequest(format!("HTTP {} - {}", status, body.trim())));
        }

        response
            .json()
            .await
            .map_err(|e| ChainError::RpcRequest(e.to_string()))
    }

    /// Check the node is reachable
    pub async fn ping(&self) -> ChainResult<()> {
        self.best_block().await.map(|_| ())
    }
}

/// Decode 0x-prefixed hex
pub fn decode_hex(value: &str) -> ChainResult<Vec<u8>> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    Ok(hex::decode(stripped)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ref_and_tag() {
        let block = BlockInfo {
            id: "0x00000000851caf3cfdb6e41f0ff08b0f5bd85b3c4fba4d4c0d29b09eaf4d3c27".to_string(),
            number: 0,
        };
        assert_eq!(block.block_ref().unwrap(), [0, 0, 0, 0, 0x85, 0x1c, 0xaf, 0x3c]);
        assert_eq!(block.last_byte().unwrap(), 0x27);

        let short = BlockInfo { id: "0x0102".to_string(), number: 1 };
        assert!(short.block_ref().is_err());
    }

    #[test]
    fn test_receipt_parsing() {
        let pending: Option<ThorReceipt> = serde_json::from_str("null").unwrap();
        assert!(pending.is_none());

        let json = r#"{
            "gasUsed": 36518,
            "gasPayer": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed",
            "reverted": true,
            "outputs": [],
            "meta": {"blockID": "0x0004f6cc", "blockNumber": 325324, "txID": "0x1234"}
        }"#;
        let receipt: ThorReceipt = serde_json::from_str(json).unwrap();
        assert!(receipt.reverted);
        assert_eq!(receipt.meta.unwrap().block_number, 325_324);
    }

    #[test]
    fn test_simulation_output_parsing() {
        let json = r#"[{"data":"0x08c379a0","events":[],"transfers":[],"gasUsed":0,"reverted":true,"vmError":"execution reverted"}]"#;
        let outputs: Vec<SimulationOutput> = serde_json::from_str(json).unwrap();
        assert!(outputs[0].reverted);
        assert_eq!(outputs[0].vm_error, "execution reverted");
    }
}
