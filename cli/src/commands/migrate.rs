// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Database Migration Command
//!
//! `agent-registry migrate` applies the bundled PostgreSQL schema
//! migrations. The connection string comes from `--database-url`,
//! `AGENT_REGISTRY_DATABASE_URL` or the configured storage section, in that
//! order.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use agent_registry_core::domain::registry_config::RegistryConfigManifest;
use agent_registry_core::infrastructure::db::Database;

#[derive(Args)]
pub struct MigrateCommand {
    /// PostgreSQL connection string
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,
}

pub async fn execute(cmd: MigrateCommand, config_path: Option<PathBuf>) -> Result<()> {
    println!("{}", "Agent Registry Migrate".bold().green());

    let database_url = match cmd.database_url {
        Some(url) => url,
        None => RegistryConfigManifest::load_or_default(config_path)
            .context("Failed to load configuration")?
            .spec
            .storage
            .database_url
            .context("No database URL: pass --database-url or set AGENT_REGISTRY_DATABASE_URL")?,
    };

    println!("Connecting to database...");
    let db = Database::new(&database_url, 1)
        .await
        .context("Failed to connect to database")?;

    db.run_migrations().await.context("Failed to apply migrations")?;

    println!("{}", "✓ Database schema is up to date".green());

    Ok(())
}
