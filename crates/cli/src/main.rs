//! mailticks CLI — the main entry point.
//!
//! Commands:
//! - `send`    — Dry-run a send through the loopback transport and print
//!               the recorded telemetry event
//! - `config`  — Show, locate or validate the configuration

use clap::{Parser, Subcommand};
use mailticks_core::AnalyticsDetailLevel;

mod commands;
mod loopback;

#[derive(Parser)]
#[command(
    name = "mailticks",
    about = "mailticks — span and telemetry instrumentation for mail transports",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message through the loopback transport and print its event
    Send(commands::send::SendArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Load and validate the configuration file
    Validate,
}

/// Parse a detail level argument.
pub(crate) fn parse_level(s: &str) -> Result<AnalyticsDetailLevel, String> {
    s.parse()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Send(args) => commands::send::run(args)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
    }

    Ok(())
}
