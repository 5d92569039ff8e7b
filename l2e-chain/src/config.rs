//! Chain Layer Configuration
//!
//! Node endpoint, contract and signing settings for the grading call.
//! Supports loading from environment variables with the L2E_CHAIN_ prefix.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::{ChainError, ChainResult};

/// Default VeChainThor node (testnet)
pub const DEFAULT_NODE_URL: &str = "https://testnet.vechain.org";

/// Default grading contract
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xa56903cf66bacca8fb5911eb759a8566bda978ac";

/// Chain configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Node REST endpoint
    pub node_url: String,
    /// Grading contract address
    pub contract_address: String,
    /// Hex-encoded secp256k1 private key of the registrar account
    #[serde(default, skip_serializing)]
    pub private_key: Option<String>,
    /// Gas limit for the grading clause
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Blocks after the reference block before the transaction expires
    #[serde(default = "default_expiration")]
    pub expiration_blocks: u32,
    /// Upper bound on waiting for a receipt
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,
    /// Receipt polling interval
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_gas_limit() -> u64 {
    200_000
}

fn default_expiration() -> u32 {
    32
}

fn default_confirmation_timeout() -> u64 {
    120
}

fn default_poll_interval() -> u64 {
    2_000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            private_key: None,
            gas_limit: default_gas_limit(),
            expiration_blocks: default_expiration(),
            confirmation_timeout_secs: default_confirmation_timeout(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConfig")
            .field("node_url", &self.node_url)
            .field("contract_address", &self.contract_address)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("gas_limit", &self.gas_limit)
            .field("expiration_blocks", &self.expiration_blocks)
            .field("confirmation_timeout_secs", &self.confirmation_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ChainConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - L2E_CHAIN_NODE_URL: node REST endpoint
    /// - L2E_CHAIN_CONTRACT_ADDRESS: grading contract
    /// - L2E_CHAIN_PRIVATE_KEY (or VECHAIN_PRIVATE_KEY): registrar key
    /// - L2E_CHAIN_GAS_LIMIT: gas limit
    /// - L2E_CHAIN_EXPIRATION: expiration in blocks
    /// - L2E_CHAIN_CONFIRM_TIMEOUT: receipt wait bound in seconds
    /// - L2E_CHAIN_POLL_INTERVAL_MS: receipt polling interval
    /// - L2E_CHAIN_REQUEST_TIMEOUT: HTTP request timeout in seconds
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            node_url: env::var("L2E_CHAIN_NODE_URL").unwrap_or(defaults.node_url),
            contract_address: env::var("L2E_CHAIN_CONTRACT_ADDRESS")
                .unwrap_or(defaults.contract_address),
            private_key: env::var("L2E_CHAIN_PRIVATE_KEY")
                .or_else(|_| env::var("VECHAIN_PRIVATE_KEY"))
                .ok(),
            gas_limit: parse_env("L2E_CHAIN_GAS_LIMIT").unwrap_or(defaults.gas_limit),
            expiration_blocks: parse_env("L2E_CHAIN_EXPIRATION")
                .unwrap_or(defaults.expiration_blocks),
            confirmation_timeout_secs: parse_env("L2E_CHAIN_CONFIRM_TIMEOUT")
                .unwrap_or(defaults.confirmation_timeout_secs),
            poll_interval_ms: parse_env("L2E_CHAIN_POLL_INTERVAL_MS")
                .unwrap_or(defaults.poll_interval_ms),
            request_timeout_secs: parse_env("L2E_CHAIN_REQUEST_TIMEOUT")
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ChainResult<()> {
        if !(self.node_url.starts_with("http://") || self.node_url.starts_with("https://")) {
            return Err(ChainError::Configuration(format!(
                "node_url must be an http(s) URL, got '{}'",
                self.node_url
            )));
        }
        crate::abi::parse_address(&self.contract_address)?;

        match &self.private_key {
            None => {
                return Err(ChainError::Configuration(
                    "private_key is not set".to_string(),
                ))
            }
            Some(key) => {
                crate::signer::LocalSigner::from_hex(key)?;
            }
        }

        if self.gas_limit == 0 {
            return Err(ChainError::Configuration("gas_limit must be > 0".to_string()));
        }
        if self.expiration_blocks == 0 {
            return Err(ChainError::Configuration(
                "expiration_blocks must be > 0".to_string(),
            ));
        }
        if self.confirmation_timeout_secs == 0 || self.poll_interval_ms == 0 {
            return Err(ChainError::Configuration(
                "confirmation timeout and poll interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Node URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.node_url.trim_end_matches('/')
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
