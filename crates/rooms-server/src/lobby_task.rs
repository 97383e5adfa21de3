//! Central lobby loop.
//!
//! This task owns the `Lobby` instance and processes all
//! `LobbyRequest`s coming from clients.
//!
//! Routing is decided inside `rooms-core`: every `Delivery` names the
//! client it is addressed to, so this loop only looks up outbound
//! channels and sends. A delivery for a client that disconnected while
//! the request was in flight is dropped.
//!
//! A panic inside the lobby must not take the loop down with it, since
//! every connected client routes through this one task. Panics are
//! caught at the dispatch boundary and answered with a `server_error`
//! event to the requester.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rooms_core::{ClientId, Delivery, Lobby, ServerEvent};
use tracing::{debug, error, info};

use crate::types::{ClientRegistry, LobbyRequest, LobbyRx, OutboundTx};

/// Run the central lobby processing loop.
///
/// - `lobby_rx`: receives requests from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_lobby_loop(mut lobby: Lobby, mut lobby_rx: LobbyRx, clients: ClientRegistry) {
    while let Some(req) = lobby_rx.recv().await {
        let deliveries = match req {
            LobbyRequest::Message { client, request } => {
                match catch_unwind(AssertUnwindSafe(|| lobby.handle(client, request))) {
                    Ok(deliveries) => deliveries,
                    Err(_) => {
                        error!(client = client.0, "request handler panicked");
                        vec![Delivery::new(
                            client,
                            ServerEvent::server_error("internal server error"),
                        )]
                    }
                }
            }
            LobbyRequest::Disconnected { client } => {
                match catch_unwind(AssertUnwindSafe(|| lobby.disconnect(client))) {
                    Ok(deliveries) => deliveries,
                    Err(_) => {
                        error!(client = client.0, "disconnect handler panicked");
                        Vec::new()
                    }
                }
            }
        };

        if deliveries.is_empty() {
            continue;
        }

        // Snapshot of current clients to minimize lock hold time.
        let current_clients = {
            let guard = clients.read().await;
            guard.clone()
        };

        route_deliveries(deliveries, &current_clients);
    }

    info!("lobby loop shutting down (lobby_rx closed)");
}

/// Send each delivery to its addressee, if still connected.
fn route_deliveries(deliveries: Vec<Delivery>, clients: &HashMap<ClientId, OutboundTx>) {
    for delivery in deliveries {
        match clients.get(&delivery.to) {
            Some(tx) => {
                let _ = tx.send(delivery.event);
            }
            None => {
                debug!(client = delivery.to.0, "dropping delivery for gone client");
            }
        }
    }
}
