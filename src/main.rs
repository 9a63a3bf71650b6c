//! crm-ops - Application entry point
//!
//! CLI-based entry point that dispatches to the operational workflows.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crm_ops::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    errors::AppResult,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::from_env();
    if let Some(dir) = cli.project_dir {
        config = config.with_project_dir(dir);
    }
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Provision(args) => commands::provision::execute(args, config).await,
        Commands::Upgrade(args) => commands::upgrade::execute(args, config).await,
        Commands::Verify => commands::verify::execute(config).await,
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
