//! tinyweb server
//!
//! Listens on loopback port 80 by default, answers every GET with a fixed
//! page and anything else with 501, one connection at a time unless the
//! configuration raises `server.max_connections`.

use std::path::PathBuf;

use clap::Parser;

use tinyweb::config::load_or_default;
use tinyweb::lifecycle::{signals, Shutdown};
use tinyweb::net::Listener;
use tinyweb::observability::logging;
use tinyweb::HttpServer;

#[derive(Parser)]
#[command(name = "tinyweb")]
#[command(about = "Minimal web server answering GET with a fixed page", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability)?;

    tracing::info!("tinyweb v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        backlog = config.server.backlog,
        max_connections = config.server.max_connections,
        tls = config.server.tls.is_some(),
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.server)?;
    let server = HttpServer::new(config.server.clone())?;

    let shutdown = Shutdown::new();
    signals::trigger_on_ctrl_c(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
