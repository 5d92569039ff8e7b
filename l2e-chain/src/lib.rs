//! Learn2Earn Chain Layer
//!
//! On-chain side of moderation: the grading contract call on VeChainThor.
//!
//! - `abi` - `gradeSubmission(address,bool)` encoding and revert decoding
//! - `rlp` / `tx_builder` - transaction body encoding, signing hash, tx id
//! - `signer` - process-held secp256k1 registrar key
//! - `thor` - node REST client
//! - `client` - `LedgerClient` seam over sign/broadcast/receipt
//! - `gateway` - `ContractGateway`, the `LedgerGateway` implementation
//!
//! The gateway broadcasts once per call and bounds the wait for a receipt;
//! a transaction still unconfirmed when the bound expires is reported as
//! such, never as a failure that could be retried.

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rlp;
pub mod signer;
pub mod thor;
pub mod tx_builder;

pub use client::{LedgerClient, ThorLedgerClient, TxReceipt};
pub use config::ChainConfig;
pub use error::{ChainError, ChainResult};
pub use gateway::ContractGateway;
pub use signer::LocalSigner;
pub use thor::ThorClient;
