//! AI API relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                     RELAY                        │
//!   Client Request   │  ┌─────────┐    ┌─────────┐    ┌──────────────┐  │
//!   ─────────────────┼─▶│  axum   │───▶│ routing │───▶│   rewrite    │  │
//!                    │  │ server  │    │ prefix  │    │ origin+path  │  │
//!                    │  └────┬────┘    └─────────┘    └──────┬───────┘  │
//!                    │       │ "/"                           ▼          │
//!                    │  ┌────▼────┐                   ┌──────────────┐  │
//!   Client Response  │  │  usage  │                   │   forward    │──┼──▶ Upstream API
//!   ◀────────────────┼──│  page   │◀──────────────────│ (no redirect │◀─┼─── (streamed)
//!                    │  └─────────┘   upstream resp.  │  following)  │  │
//!                    │                                └──────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ai_relay::config::{load_config, ProxyConfig};
use ai_relay::lifecycle::{signals, Shutdown};
use ai_relay::observability::{logging, metrics};
use ai_relay::HttpServer;

#[derive(Parser)]
#[command(name = "ai-relay")]
#[command(about = "Path-based reverse proxy for hosted AI APIs", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("ai-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        connect_timeout_secs = config.timeouts.connect_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
