//! Learn2Earn CLI
//!
//! Runs the reward service and talks to a running instance.
//!
//! # Usage
//!
//! ```text
//! l2e [OPTIONS] <COMMAND>
//!
//! Commands:
//!   init         Initialize the submission database schema
//!   start        Start the API server
//!   address      Print the registrar address derived from the configured private key
//!   health       Check health of the API server
//!   submissions  Query submissions (list, get, approved, pending)
//!   moderate     Approve or reject a submission
//! ```
//!
//! # Examples
//!
//! ```text
//! l2e submissions pending
//! l2e moderate 0xabc... --approve --notes "certificate verified"
//! ```

pub mod client;
pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use client::L2eClient;
pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
