// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use agent_registry_core::domain::registry_config::{RegistryConfigManifest, StorageKind};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
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
        /// Output path
        #[arg(short, long, default_value = "./agent-registry.yaml")]
        output: PathBuf,

        /// Include PostgreSQL and observability sections
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, examples } => generate(output, examples),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = RegistryConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. AGENT_REGISTRY_CONFIG_PATH: {}",
            std::env::var("AGENT_REGISTRY_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./agent-registry.yaml");
        println!("  4. ~/.agent-registry/config.yaml");
        println!("  5. /etc/agent-registry/config.yaml");
        println!();
    }

    println!("{} {}", "Deployment:".bold(), config.metadata.name);
    println!();

    let storage = &config.spec.storage;
    println!("{}", "Storage:".bold());
    match storage.backend {
        StorageKind::Memory => println!("  Backend: memory"),
        StorageKind::Postgres => {
            println!("  Backend: postgres");
            println!(
                "  Database URL: {}",
                if storage.database_url.is_some() { "(set)" } else { "(missing)" }
            );
            println!("  Max connections: {}", storage.max_connections);
            println!("  Run migrations: {}", storage.run_migrations);
        }
    }
    println!();

    println!("{}", "HTTP:".bold());
    println!("  Listen: {}:{}", config.spec.http.bind_address, config.spec.http.port);
    println!();

    println!("{}", "Pagination:".bold());
    println!("  Default limit: {}", config.spec.pagination.default_limit);
    println!("  Max limit: {}", config.spec.pagination.max_limit);
    println!();

    if let Some(observability) = &config.spec.observability {
        println!("{}", "Observability:".bold());
        if let Some(logging) = &observability.logging {
            println!("  Log level: {} ({})", logging.level, logging.format);
        }
        if let Some(metrics) = &observability.metrics {
            println!("  Metrics: {} (port {})", metrics.enabled, metrics.port);
        }
        println!();
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = RegistryConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample).with_context(|| format!("Failed to write config to {:?}", output))?;

    println!("{}", format!("✓ Configuration generated: {}", output.display()).green());

    Ok(())
}
