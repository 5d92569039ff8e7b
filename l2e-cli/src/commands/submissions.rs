//! Submission query commands

use clap::Subcommand;

/// Submission queries
#[derive(Subcommand, Debug)]
pub enum SubmissionCommands {
    /// List all submissions, newest first
    List,

    /// Show one submission's status
    Get {
        /// Wallet address of the participant
        identity: String,
    },

    /// List approved participants
    Approved,

    /// List submissions awaiting moderation, oldest first
    Pending,
}
