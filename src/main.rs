//! Echo API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ net listener ─▶ http server ─▶ JsonBody     │
//!                              │                   (trace, metrics,  extractor │
//!                              │                    timeout, limit)     │      │
//!                              │                                        ▼      │
//!     Client Response          │                                 echo handler  │
//!     ◀────────────────────────┼──────────── plain-text render ◀───────┘      │
//!                              │                                               │
//!                              │  config (file, PORT/HOST, CLI)   lifecycle    │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use echo_api::config::{load_config, ObservabilityConfig, Overrides};
use echo_api::lifecycle::{spawn_signal_listener, startup, Shutdown};
use echo_api::observability::logging;

#[derive(Parser)]
#[command(name = "echo-api")]
#[command(about = "HTTP server that echoes the caller's request back as text", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind; overrides HOST and the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on; overrides PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
    };

    let config = match load_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            // Still report through the subscriber.
            logging::init_logging(&ObservabilityConfig::default());
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("echo-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_body_bytes = config.limits.max_body_bytes,
        strict_json = config.limits.strict_json,
        request_timeout_secs = config.limits.request_timeout_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let (server, listener) = startup::prepare(config).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
