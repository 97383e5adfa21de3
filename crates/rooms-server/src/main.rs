//! Binary TCP server for multiplayer chess rooms.

use anyhow::Result;
use rooms_server::config::Config;
use rooms_server::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        max_clients = config.max_clients,
        "starting rooms-server"
    );

    server::run(config).await
}
