//! Learn2Earn Core
//!
//! Domain types and interfaces shared by the reward service crates:
//! - `WalletAddress` - canonical participant identity
//! - `Submission` - one proof-of-completion record per identity
//! - `SubmissionStore` - durable lifecycle storage
//! - `LedgerGateway` - on-chain grading call and its interpreted outcome
//!
//! Storage and chain access live in `l2e-db` and `l2e-chain`; the
//! moderation workflow that couples them lives in `l2e-api`.

pub mod error;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod types;

pub use error::*;
pub use gateway::LedgerGateway;
pub use store::SubmissionStore;
pub use types::*;
