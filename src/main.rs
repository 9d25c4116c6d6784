mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rental_assistant::config::{Config, Overrides, Profile};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::admin::AdminCommand;
use commands::quote::QuoteArgs;

/// Apartment rental assistant: chat, booking configurator and back office
#[derive(Debug, Parser)]
#[command(name = "rental-assistant", version)]
struct Cli {
    /// Deployment profile
    #[arg(long, value_enum, global = true)]
    profile: Option<Profile>,

    /// Base URL of the search assistant
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// Base URL of the admin API
    #[arg(long, global = true)]
    admin_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Talk with the assistant
    Chat {
        /// Restrict search results to one document type
        #[arg(long = "type")]
        search_type: Option<String>,
    },
    /// Price a typology with options and print the booking summary
    Quote(QuoteArgs),
    /// Manage the indexed documents and apartments
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(Overrides {
        profile: cli.profile,
        search_base_url: cli.search_url,
        admin_base_url: cli.admin_url,
        timeout_secs: cli.timeout,
    })?;
    debug!("Using {:?}", config);

    match cli.command {
        Command::Chat { search_type } => commands::chat::run(&config, search_type).await,
        Command::Quote(args) => commands::quote::run(&args).await,
        Command::Admin { command } => commands::admin::run(&config, command).await,
    }
}
