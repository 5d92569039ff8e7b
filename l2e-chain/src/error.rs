//! Chain Layer Error Types
//!
//! Error definitions for contract-call encoding, signing and submission.

use thiserror::Error;

/// Chain Layer Error
#[derive(Error, Debug)]
pub enum ChainError {
    /// Node connection error
    #[error("Node connection failed: {0}")]
    RpcConnection(String),

    /// Node request error
    #[error("Node request failed: {0}")]
    RpcRequest(String),

    /// Transaction building error
    #[error("Transaction build failed: {0}")]
    TransactionBuild(String),

    /// Transaction signing error
    #[error("Transaction signing failed: {0}")]
    TransactionSign(String),

    /// Transaction broadcast error
    #[error("Transaction broadcast failed: {0}")]
    TransactionBroadcast(String),

    /// Signed transaction may or may not have reached the node
    #[error("Broadcast of {tx_id} has unknown outcome: {reason}")]
    BroadcastUncertain { tx_id: String, reason: String },

    /// Confirmation timeout
    #[error("No receipt for {tx_id} after {waited_secs}s")]
    ConfirmationTimeout { tx_id: String, waited_secs: u64 },

    /// Invalid address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid credential
    #[error("Invalid signing credential: {0}")]
    InvalidCredential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),
}

/// Chain Result type
pub type ChainResult<T> = Result<T, ChainError>;

impl From<reqwest::Error> for ChainError {
    fn from(e: reqwest::Error) -> Self {
        ChainError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for ChainError {
    fn from(e: hex::FromHexError) -> Self {
        ChainError::Serialization(format!("Hex decode error: {}", e))
    }
}
