//! payload-router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request id, timeout)
//!                         │
//!                         ▼
//!                     http::app (Context) ──▶ routing (best RouteOutcome)
//!                         │                        │
//!                         │                        ▼
//!                         │                    Payload
//!                         ▼                        │
//!     Client Response  payload::BodyResolver ◀─────┘
//!     ◀────────────── (content types, compilers, templates, resources)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use payload_router::config::{self, AppConfig};
use payload_router::lifecycle::{build_app, Shutdown};
use payload_router::observability::{logging, metrics};
use payload_router::{HttpServer, RouteCollection};

#[derive(Parser)]
#[command(name = "payload-router")]
#[command(about = "Serve a resource tree with templates and compiled assets", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resource root, overriding the configuration.
    #[arg(short, long)]
    root: Option<String>,

    /// Bind address, overriding the configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<AppConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.resources.root = root.clone();
    }
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init(&config.observability.log_level);
    tracing::info!("payload-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        root = %config.resources.root,
        compilers = config.compilers.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = Arc::new(build_app(&config, RouteCollection::new()));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.server.clone(), app);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::signal::ctrl_c().await?;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
