//! Command Handlers

use l2e_api::{ApiConfig, ModerateRequest};
use l2e_chain::{ChainConfig, ContractGateway, LedgerClient, LocalSigner};
use l2e_db::{open_store, DbConfig, L2eDatabase};
use std::sync::Arc;

use crate::client::L2eClient;
use crate::commands::{submissions::SubmissionCommands, Cli, Commands, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Init => return handle_init(&cli).await,
        Commands::Start {
            host,
            port,
            moderator_key,
            no_cors,
        } => {
            let api_config = ApiConfig {
                host: host.clone(),
                port: *port,
                enable_cors: !*no_cors,
                moderator_key: moderator_key.clone().unwrap_or_default(),
            };
            return handle_start(&cli, api_config).await;
        }
        Commands::Address => return handle_address(&cli.chain.to_config()),
        _ => {}
    }

    let client = L2eClient::new(&cli.api_url)?;
    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            output::print_health(&health, cli.format);
        }
        Commands::Submissions(cmd) => handle_submissions(&client, cmd, cli.format).await?,
        Commands::Moderate {
            identity,
            approve,
            reject: _,
            notes,
            moderator_key,
        } => {
            let request = ModerateRequest {
                approved: Some(approve),
                moderator_notes: notes,
            };
            let result = client.moderate(&identity, &moderator_key, &request).await?;
            output::print_moderation(&result, cli.format);
        }
        Commands::Init | Commands::Start { .. } | Commands::Address => {}
    }
    Ok(())
}

fn db_config(cli: &Cli) -> DbConfig {
    DbConfig {
        url: cli.db_url.clone(),
        max_connections: cli.db_max_connections,
    }
}

/// Handle database initialization
async fn handle_init(cli: &Cli) -> CliResult<()> {
    let config = db_config(cli);
    if config.is_memory_store() {
        return Err(CliError::invalid_arg(
            "the in-memory store has no schema to initialize",
        ));
    }

    println!("Initializing Learn2Earn database...");
    println!("  URL: {}", config.url);

    let database = L2eDatabase::connect(&config).await?;
    database.init_schema().await?;

    println!("Database schema initialized successfully.");
    Ok(())
}

/// Handle starting the API server
async fn handle_start(cli: &Cli, api_config: ApiConfig) -> CliResult<()> {
    let config = db_config(cli);
    let chain_config = cli.chain.to_config();

    println!("Starting Learn2Earn API server...");
    println!("  Host: {}:{}", api_config.host, api_config.port);
    println!("  Database: {}", config.url);
    println!("  Node: {}", chain_config.node_url);
    println!("  Contract: {}", chain_config.contract_address);

    let gateway = ContractGateway::from_config(&chain_config)?;
    println!("  Registrar: {}", gateway.client().signer_address());

    let store = open_store(&config).await?;
    println!("Database schema initialized.");

    l2e_api::run_server(&api_config, store, Arc::new(gateway))
        .await
        .map_err(|e| CliError::server(e.to_string()))
}

/// Print the registrar address
fn handle_address(chain_config: &ChainConfig) -> CliResult<()> {
    let key = chain_config
        .private_key
        .as_deref()
        .ok_or_else(|| CliError::config("set L2E_CHAIN_PRIVATE_KEY or VECHAIN_PRIVATE_KEY"))?;
    let signer = LocalSigner::from_hex(key)?;
    println!("{}", signer.address_hex());
    Ok(())
}

async fn handle_submissions(
    client: &L2eClient,
    cmd: SubmissionCommands,
    format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        SubmissionCommands::List => {
            let submissions = client.list_submissions().await?;
            output::print_submissions(&submissions, format);
        }
        SubmissionCommands::Pending => {
            let submissions = client.list_pending().await?;
            output::print_submissions(&submissions, format);
        }
        SubmissionCommands::Approved => {
            let entries = client.list_approved().await?;
            output::print_approved(&entries, format);
        }
        SubmissionCommands::Get { identity } => {
            let status = client.get_submission(&identity).await?;
            output::print_status(&identity, &status, format);
        }
    }
    Ok(())
}
