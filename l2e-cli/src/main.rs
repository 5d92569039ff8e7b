//! Learn2Earn CLI Entry Point
//!
//! Configuration is loaded from environment variables (via .env file).
//! Command-line arguments override environment variables.
//!
//! Usage:
//!   l2e init         - Initialize the database schema
//!   l2e start        - Start the API server (auto-initializes schema)
//!   l2e address      - Print the registrar address
//!   l2e health       - Check health of the API server
//!   l2e submissions  - Query submissions
//!   l2e moderate     - Approve or reject a submission

use clap::Parser;
use l2e_cli::{handler, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The server always logs; other commands only when verbose
    if cli.verbose || matches!(cli.command, l2e_cli::Commands::Start { .. }) {
        init_logging(cli.verbose);
    }

    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging with tracing
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "l2e_cli=debug,l2e_api=debug,l2e_chain=debug,l2e_db=debug,tower_http=debug"
    } else {
        "l2e_api=info,l2e_chain=info,l2e_db=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
