// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! `storehouse serve`
//!
//! Loads configuration, opens storage, wires the services and serves the
//! HTTP API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use storehouse_core::application::{create_repositories, Services};
use storehouse_core::domain::config::StorehouseConfig;
use storehouse_core::domain::repository::StorageBackend;
use storehouse_core::infrastructure::db::Database;
use storehouse_core::presentation::app;

/// Command-line values that win over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerOverrides {
    pub fn apply(&self, config: &mut StorehouseConfig) {
        if let Some(host) = &self.host {
            config.spec.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.spec.server.port = port;
        }
    }
}

pub async fn run(config_path: Option<PathBuf>, overrides: ServerOverrides) -> Result<()> {
    let mut config =
        StorehouseConfig::load_or_default(config_path).context("Failed to load configuration")?;
    overrides.apply(&mut config);
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        church = %config.spec.church.name,
        currency = %config.spec.church.currency,
        "Starting Storehouse"
    );

    if let Some(port) = config.spec.observability.metrics_port {
        install_metrics_exporter(port)?;
    }

    let backend = config.storage_backend();
    let pool = match &backend {
        StorageBackend::PostgreSQL(pg) => {
            let db = Database::connect(pg).await?;
            if config.spec.database.run_migrations {
                db.migrate().await?;
            }
            Some(db.get_pool().clone())
        }
        StorageBackend::InMemory => {
            warn!("Using in-memory storage; data is lost when the process exits");
            None
        }
    };
    let services = Services::new(&create_repositories(&backend, pool));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app(services))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shut down");
    Ok(())
}

fn install_metrics_exporter(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;
    info!("Prometheus metrics exposed on {}", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
