// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `agent-registry serve`: loads configuration, wires the store and services
//! and runs the REST API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Args;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use agent_registry_core::application::lifecycle::StandardAgentLifecycleService;
use agent_registry_core::application::repository_factory::create_agent_store;
use agent_registry_core::application::source_manager::StandardSourceService;
use agent_registry_core::application::tool_manager::StandardToolService;
use agent_registry_core::domain::registry_config::RegistryConfigManifest;
use agent_registry_core::presentation::api::{app, AppState};

#[derive(Args)]
pub struct ServeCommand {
    /// Override the configured bind address
    #[arg(long, env = "AGENT_REGISTRY_HOST")]
    host: Option<String>,

    /// Override the configured HTTP port
    #[arg(long, env = "AGENT_REGISTRY_PORT")]
    port: Option<u16>,
}

pub async fn execute(cmd: ServeCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = RegistryConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    info!("Configuration loaded: {}", config.metadata.name);

    if let Some(metrics) = config.spec.observability.as_ref().and_then(|o| o.metrics.as_ref()) {
        if metrics.enabled {
            let addr: SocketAddr = ([0, 0, 0, 0], metrics.port).into();
            match PrometheusBuilder::new().with_http_listener(addr).install() {
                Ok(()) => info!("Prometheus metrics exporter listening on {}", addr),
                Err(e) => warn!("Failed to install metrics exporter: {}", e),
            }
        }
    }

    let store = create_agent_store(&config.storage_backend(), config.spec.storage.run_migrations)
        .await
        .context("Failed to initialize agent store")?;

    let agent_service = Arc::new(
        StandardAgentLifecycleService::new(store.clone()).with_pagination(config.spec.pagination),
    );
    let tool_service = Arc::new(StandardToolService::new(store.clone()));
    let source_service = Arc::new(StandardSourceService::new(store));

    let router = app(AppState::new(agent_service, tool_service, source_service));

    let host = cmd.host.unwrap_or(config.spec.http.bind_address);
    let port = cmd.port.unwrap_or(config.spec.http.port);
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Agent registry listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Agent registry shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
