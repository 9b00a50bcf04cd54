//! Edge Forwarder
//!
//! Transparent request relay for the admin console's API calls.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                EDGE FORWARDER                │
//!   Client Request     │  ┌─────────┐   ┌─────────┐   ┌───────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ routing │──▶│  forward  │───┼──▶ Upstream
//!                      │  │ server  │   │ prefix  │   │  handler  │   │    Origin
//!   Client Response    │  └─────────┘   └─────────┘   └─────┬─────┘   │
//!   ◀──────────────────┼─────── status, headers, body stream ┘         │
//!                      │                                              │
//!                      │  config (TOML + TARGET_URL)  observability   │
//!                      │  lifecycle (signals, shutdown, reload)       │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use edge_forwarder::config::{
    load_config_with, validate_config, ConfigOverrides, ForwarderConfig,
};
use edge_forwarder::lifecycle::startup;
use edge_forwarder::observability::logging;

#[derive(Parser)]
#[command(name = "edge-forwarder")]
#[command(about = "Relay API requests to an upstream origin unchanged", long_about = None)]
struct Cli {
    /// TOML configuration file (watched for changes).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.target_url.
    #[arg(short, long)]
    target_url: Option<String>,

    /// Override observability.log_level.
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            target_url: self.target_url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    let config = match &cli.config {
        Some(path) => match load_config_with(path, &overrides) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("edge-forwarder: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut config = ForwarderConfig::default();
            overrides.apply(&mut config);
            config
        }
    };

    if let Err(errors) = validate_config(&config) {
        for error in errors {
            eprintln!("edge-forwarder: {error}");
        }
        return ExitCode::FAILURE;
    }

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        path_prefixes = ?config.route.path_prefixes,
        "edge-forwarder starting"
    );

    match startup::run(config, cli.config, overrides).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
