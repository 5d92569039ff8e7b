//! CLI Commands Module
//!
//! Command definitions for the Learn2Earn CLI.

pub mod submissions;

use clap::{Args, Parser, Subcommand};
use l2e_chain::ChainConfig;

/// Learn2Earn reward service CLI
#[derive(Parser, Debug)]
#[command(name = "l2e")]
#[command(version)]
#[command(about = "Learn2Earn reward service command line interface")]
#[command(long_about = "Run and operate the Learn2Earn reward service.\n\n\
    Participants submit proof of course completion; a moderator approves or \
    rejects each submission, and approval grades it on-chain, which \
    distributes the reward.")]
pub struct Cli {
    /// API endpoint URL
    #[arg(short, long, env = "L2E_API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Database URL: sqlite://path?mode=rwc, sqlite::memory:, or mem:// (env: L2E_DB_URL)
    #[arg(long, env = "L2E_DB_URL", default_value = "sqlite://learn2earn.db?mode=rwc")]
    pub db_url: String,

    /// Database pool size (env: L2E_DB_MAX_CONNECTIONS)
    #[arg(long, env = "L2E_DB_MAX_CONNECTIONS", default_value = "5")]
    pub db_max_connections: u32,

    /// Chain settings
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Output format (json, table)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Chain overrides; unset values fall back to `ChainConfig::from_env`
#[derive(Args, Debug, Default)]
pub struct ChainArgs {
    /// VeChainThor node URL (env: L2E_CHAIN_NODE_URL)
    #[arg(long, global = true)]
    pub node_url: Option<String>,

    /// Grading contract address (env: L2E_CHAIN_CONTRACT_ADDRESS)
    #[arg(long, global = true)]
    pub contract_address: Option<String>,

    /// Seconds to wait for a receipt (env: L2E_CHAIN_CONFIRM_TIMEOUT)
    #[arg(long, global = true)]
    pub confirm_timeout: Option<u64>,
}

impl ChainArgs {
    /// Environment configuration with command-line overrides applied
    ///
    /// The private key is only ever read from the environment.
    pub fn to_config(&self) -> ChainConfig {
        let mut config = ChainConfig::from_env();
        if let Some(url) = &self.node_url {
            config.node_url = url.clone();
        }
        if let Some(address) = &self.contract_address {
            config.contract_address = address.clone();
        }
        if let Some(secs) = self.confirm_timeout {
            config.confirmation_timeout_secs = secs;
        }
        config
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table format (human-readable)
    #[default]
    Table,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the submission database schema
    Init,

    /// Start the API server
    Start {
        /// Host to bind to (env: L2E_API_HOST)
        #[arg(short = 'H', long, env = "L2E_API_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on (env: PORT)
        #[arg(short, long, env = "PORT", default_value = "3001")]
        port: u16,
        /// Shared moderator key (env: MODERATOR_KEY)
        #[arg(long, env = "MODERATOR_KEY", hide_env_values = true)]
        moderator_key: Option<String>,
        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },

    /// Print the registrar address derived from the configured private key
    Address,

    /// Check health of the API server
    Health,

    /// Query submissions
    #[command(subcommand)]
    Submissions(submissions::SubmissionCommands),

    /// Approve or reject a submission (approval distributes the reward)
    Moderate {
        /// Wallet address of the participant
        identity: String,
        /// Approve the submission
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: bool,
        /// Reject the submission
        #[arg(long)]
        reject: bool,
        /// Moderator notes
        #[arg(long)]
        notes: Option<String>,
        /// Shared moderator key (env: MODERATOR_KEY)
        #[arg(long, env = "MODERATOR_KEY", hide_env_values = true)]
        moderator_key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["l2e", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_moderate_requires_a_verdict() {
        let result = Cli::try_parse_from(["l2e", "moderate", "0xabc", "--moderator-key", "k"]);
        assert!(result.is_err());

        let both = Cli::try_parse_from([
            "l2e", "moderate", "0xabc", "--approve", "--reject", "--moderator-key", "k",
        ]);
        assert!(both.is_err());

        let cli = Cli::try_parse_from([
            "l2e", "moderate", "0xabc", "--reject", "--notes", "blurry", "--moderator-key", "k",
        ])
        .unwrap();
        match cli.command {
            Commands::Moderate { approve, reject, notes, .. } => {
                assert!(!approve);
                assert!(reject);
                assert_eq!(notes.as_deref(), Some("blurry"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chain_overrides() {
        let cli = Cli::try_parse_from([
            "l2e",
            "address",
            "--node-url",
            "http://localhost:8669",
            "--confirm-timeout",
            "30",
        ])
        .unwrap();
        let config = cli.chain.to_config();
        assert_eq!(config.node_url, "http://localhost:8669");
        assert_eq!(config.confirmation_timeout_secs, 30);
    }
}
