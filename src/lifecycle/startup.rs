//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last, after metrics and the client are ready
//! - A bad config reload is logged and ignored; the server keeps running

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{ConfigOverrides, ConfigWatcher, ForwarderConfig};
use crate::forward::ForwardError;
use crate::http::ForwardServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Client(#[from] ForwardError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the forwarder until SIGINT/SIGTERM.
///
/// When `config_path` is given, the file is watched and valid edits are
/// applied live, with `overrides` layered on top of each reload.
pub async fn run(
    config: ForwarderConfig,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = ForwardServer::new(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();

    let (config_updates, _watcher) = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path, overrides, config);
            (updates, Some(watcher.run(shutdown.subscribe())?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(async move {
        server.run(listener, config_updates, server_shutdown).await
    });

    signals::wait_for_shutdown_signal().await;
    let notified = shutdown.trigger();
    tracing::info!(tasks = notified, "Shutdown triggered");

    match server_task.await {
        Ok(result) => result.map_err(StartupError::Serve),
        Err(e) => Err(StartupError::Serve(std::io::Error::other(e))),
    }
}
