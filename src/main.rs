//! Routing gateway binary.
//!
//! ```text
//!     Client ──▶ listener ──▶ router ──▶ auth gate ──▶ rewriter ──▶ forwarder ──▶ Backend
//!                                          │                                      service
//!                                          ▼
//!                                    login service
//! ```

use std::path::PathBuf;

use clap::Parser;

use routing_gateway::lifecycle::{signals, startup};
use routing_gateway::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(author, version, about = "Authenticating request-forwarding gateway")]
struct Args {
    /// Path to the TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = startup::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    startup::init_observability(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        connect_timeout_secs = config.timeouts.connect_secs,
        "routing-gateway starting"
    );

    let server = HttpServer::new(&config)?;
    let listener = startup::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
