//! ModredIP backend
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────┐
//!                    │                  MODRED BACKEND                    │
//!                    │                                                    │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌──────────────────┐ │
//!   ─────────────────┼─▶│  http  │──▶│ handlers │──▶│ blockchain       │─┼──▶ Etherlink RPC
//!                    │  │ server │   │          │   │ (IpRegistry)     │ │
//!                    │  └────────┘   │          │   └──────────────────┘ │
//!                    │               │          │   ┌──────────────────┐ │
//!                    │               │          │──▶│ yakoa client     │─┼──▶ Yakoa IP API
//!                    │               │          │   └──────────────────┘ │
//!                    │               │          │   ┌──────────────────┐ │
//!                    │               │          │──▶│ ipfs (pinata)    │─┼──▶ Pinata
//!                    │               └──────────┘   └──────────────────┘ │
//!                    │                                                    │
//!                    │  config · observability · resilience · lifecycle   │
//!                    └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use modred_backend::config::load_with_env;
use modred_backend::lifecycle::{signals, startup, Shutdown};
use modred_backend::observability::{logging, metrics};
use modred_backend::HttpServer;

#[derive(Parser)]
#[command(name = "modred-backend")]
#[command(about = "ModredIP backend API", version)]
struct Args {
    /// Path to the TOML config file. Missing file means defaults.
    #[arg(short, long, env = "MODRED_CONFIG", default_value = "modred.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_with_env(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "modred-backend starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = %config.listener.environment,
        rpc_url = %config.blockchain.rpc_url,
        yakoa_base = %config.yakoa.api_base(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    startup::report_missing_credentials(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = startup::build_registry(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config, registry)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
