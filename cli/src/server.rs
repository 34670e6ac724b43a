// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Relay HTTP server bootstrap

use anyhow::{Context, Result};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use esign_core::{
    application::StandardSigningWorkflow,
    domain::relay_config::RelayConfig,
    infrastructure::{InMemoryDocumentRegistry, OpenSignClient},
    presentation::{app, AppState},
};

/// Command-line overrides for `serve`
#[derive(Debug, Default, Clone)]
pub struct ServeOptions {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
}

/// Load, override and validate the relay configuration.
pub fn load_config(options: &ServeOptions) -> Result<RelayConfig> {
    let mut config = RelayConfig::load(options.config_path.as_deref())
        .context("Failed to load configuration")?;

    if let Some(host) = &options.host {
        config.server.bind_address = host.clone();
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Wire the provider client, registry and workflow into the HTTP router.
pub fn build_app(config: &RelayConfig) -> Result<Router> {
    let provider = Arc::new(
        OpenSignClient::from_config(&config.provider)
            .context("Failed to initialize OpenSign client")?,
    );
    let registry = Arc::new(InMemoryDocumentRegistry::new());
    let workflow = Arc::new(StandardSigningWorkflow::new(
        provider,
        registry,
        config.signers.clone(),
    ));

    let state = AppState::new(workflow, config.server.upload_dir.clone());
    Ok(app(state, config.server.max_upload_bytes))
}

pub async fn start_server(options: ServeOptions) -> Result<()> {
    let config = load_config(&options)?;

    info!(
        provider = %config.provider.base_url,
        auth_scheme = ?config.provider.auth_scheme,
        roles = ?config.signers.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.server.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.server.upload_dir.display()
            )
        })?;

    if let Some(port) = options.metrics_port {
        install_metrics_exporter(&config.server.bind_address, port)?;
    }

    let app = build_app(&config)?;

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("eSign relay listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("eSign relay shutting down");

    Ok(())
}

fn install_metrics_exporter(host: &str, port: u16) -> Result<()> {
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("Metrics listener needs an IP bind address, got '{}'", host))?;
    let addr = SocketAddr::new(ip, port);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics available on http://{}/metrics", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
