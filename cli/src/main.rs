// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Agent Registry CLI
//!
//! The `agent-registry` binary hosts the registry REST API and manages its
//! configuration and database schema.
//!
//! ## Commands
//!
//! - `agent-registry serve` - Run the HTTP API
//! - `agent-registry migrate` - Apply PostgreSQL schema migrations
//! - `agent-registry config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use agent_registry_core::domain::registry_config::RegistryConfigManifest;

mod commands;

use commands::{ConfigCommand, MigrateCommand, ServeCommand};

/// Agent Registry - multi-tenant agent, tool and source management
#[derive(Parser)]
#[command(name = "agent-registry")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "AGENT_REGISTRY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "AGENT_REGISTRY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "AGENT_REGISTRY_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registry HTTP API
    #[command(name = "serve")]
    Serve {
        #[command(flatten)]
        command: ServeCommand,
    },

    /// Apply database migrations
    #[command(name = "migrate")]
    Migrate {
        #[command(flatten)]
        command: MigrateCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Flags win over the config file's observability.logging section
    let logging = RegistryConfigManifest::load_or_default(cli.config.clone())
        .ok()
        .and_then(|config| config.spec.observability)
        .and_then(|observability| observability.logging);
    let level = cli
        .log_level
        .clone()
        .or_else(|| logging.as_ref().map(|l| l.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let json = cli.log_json || logging.as_ref().is_some_and(|l| l.format == "json");

    init_logging(&level, json)?;

    match cli.command {
        Some(Commands::Serve { command }) => commands::serve::execute(command, cli.config).await,
        Some(Commands::Migrate { command }) => commands::migrate::execute(command, cli.config).await,
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
