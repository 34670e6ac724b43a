// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # eSign Relay CLI
//!
//! The `esign-relay` binary hosts the HTTP relay in front of OpenSign Labs.
//!
//! ## Commands
//!
//! - `esign-relay serve` - Run the HTTP server (default when no command is given)
//! - `esign-relay config show|validate|generate` - Configuration management
//!
//! Provider credentials come from `OPENSIGNLABS_API_URL` and
//! `OPENSIGNLABS_API_KEY`, optionally through a `.env` file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use esign_relay::commands::{self, ConfigCommand};
use esign_relay::server::{self, ServeOptions};

/// eSign Relay - Document-signing workflow in front of OpenSign Labs
#[derive(Parser)]
#[command(name = "esign-relay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "ESIGN_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP bind address (overrides server.bind_address)
    #[arg(long, global = true, env = "ESIGN_HOST")]
    host: Option<String>,

    /// HTTP port (overrides server.port)
    #[arg(long, global = true, env = "PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ESIGN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Expose Prometheus metrics on this port
    #[arg(long, global = true, env = "ESIGN_METRICS_PORT")]
    metrics_port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP relay
    #[command(name = "serve")]
    Serve,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed arguments
    let dotenv = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    if let Some(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("Starting eSign relay");
            server::start_server(ServeOptions {
                config_path: cli.config,
                host: cli.host,
                port: cli.port,
                metrics_port: cli.metrics_port,
            })
            .await
        }
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
