//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single central lobby task that owns the `Lobby`.
//!
//! The actual per-client logic and lobby loop live in `client` and
//! `lobby_task` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use rooms_core::{ClientId, Lobby};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::types::{ClientRegistry, LobbyRx, LobbyTx, OutboundRx, OutboundTx};
use crate::{client, lobby_task};

/// Global-ish counter for assigning unique `ClientId`s.
///
/// In a more elaborate setup you might encapsulate this in a struct,
/// but this is sufficient and threadsafe for our server.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Run the TCP server with the given configuration.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    // Shared registry of clients → outbound channels.
    let clients: ClientRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    // Channel from clients → lobby task.
    let (lobby_tx, lobby_rx): (LobbyTx, LobbyRx) = mpsc::unbounded_channel();

    // Spawn the central lobby task.
    {
        let lobby = Lobby::new(config.color_policy);
        let clients_clone = clients.clone();
        tokio::spawn(async move {
            lobby_task::run_lobby_loop(lobby, lobby_rx, clients_clone).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };

        if current_clients >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Just drop the stream; client will see connection refused/closed.
            continue;
        }

        let client_id = next_client_id();
        info!(client = client_id.0, %peer_addr, "accepted connection");

        // Create outbound channel for this client.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Register client.
        {
            let mut guard = clients.write().await;
            guard.insert(client_id, out_tx.clone());
        }

        // Clone handles to move into the client task.
        let clients_clone = clients.clone();
        let lobby_tx_clone = lobby_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = client::run_client(
                client_id,
                stream,
                lobby_tx_clone,
                out_tx,
                out_rx,
                clients_clone,
            )
            .await
            {
                warn!(client = client_id.0, error = %e, "client ended with error");
            } else {
                info!(client = client_id.0, "client disconnected");
            }
        });
    }
}
