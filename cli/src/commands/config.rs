// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use esign_core::domain::relay_config::{RelayConfig, ENV_CONFIG_PATH};

const SAMPLE_CONFIG: &str = include_str!("../../templates/esign-config.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration (API key masked)
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./esign-config.yaml)
        #[arg(short, long, default_value = "./esign-config.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, force } => generate(&output, force),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config =
        RelayConfig::load(config_override.as_deref()).context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            ENV_CONFIG_PATH,
            std::env::var(ENV_CONFIG_PATH)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./esign-config.yaml");
        println!("  4. /etc/esign-relay/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    let config = config.redacted();

    println!("{}", "Server:".bold());
    println!(
        "  Listen: {}:{}",
        config.server.bind_address, config.server.port
    );
    println!("  Upload dir: {}", config.server.upload_dir.display());
    println!("  Max upload: {} bytes", config.server.max_upload_bytes);
    println!();

    println!("{}", "Provider:".bold());
    println!(
        "  Base URL: {}",
        if config.provider.base_url.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            config.provider.base_url.clone()
        }
    );
    println!(
        "  API key: {}",
        if config.provider.api_key.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            config.provider.api_key.clone()
        }
    );
    println!("  Auth scheme: {:?}", config.provider.auth_scheme);
    println!("  Timeout: {}s", config.provider.timeout_seconds);
    println!();

    println!("{}", "Signers:".bold());
    for (position, layout) in config.signers.iter().enumerate() {
        println!("  {}. {}", position + 1, layout.label.bold());
        for widget in &layout.widgets {
            println!(
                "      - {:?} on page {} at ({}, {})",
                widget.kind, widget.page, widget.x, widget.y
            );
        }
    }
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config =
        RelayConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    std::fs::write(output, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config = RelayConfig::from_yaml_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.signers.role1.label, "HR");
        assert_eq!(config.signers.role3.label, "Role 3");
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("esign-config.yaml");

        generate(&output, false).unwrap();
        assert!(generate(&output, false).is_err());
        assert!(generate(&output, true).is_ok());

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, SAMPLE_CONFIG);
    }
}
