//! Memescout - screens fresh memecoin listings and alerts via Telegram
//!
//! # WARNING
//! Alerts are heuristics over unreliable public data, not investment advice.
//! Most freshly listed tokens go to zero regardless of what the gates say.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use memescout::cli::commands;
use memescout::config::Config;

/// Memecoin screening bot
#[derive(Parser)]
#[command(name = "memescout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the screening loop
    Start,

    /// Show current configuration (secrets masked)
    Config,

    /// Check reachability of the source provider and Telegram
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("memescout=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // The only fatal runtime precondition: without a working notification
    // target the loop would screen into the void.
    if matches!(cli.command, Commands::Start) {
        if let Err(e) = config.require_notifier() {
            error!("Startup check failed: {}", e);
            std::process::exit(1);
        }
        info!("Startup checks passed");
    }

    let result = match cli.command {
        Commands::Start => commands::start(&config).await,
        Commands::Config => commands::show_config(&config),
        Commands::Health => commands::health(&config).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
