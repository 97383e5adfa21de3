//! Shared types for the rooms TCP server.
//!
//! This module defines:
//! - channel aliases between client tasks and the lobby loop
//! - `LobbyRequest`: messages flowing from clients to the lobby
//!
//! `ClientId` itself lives in `rooms-core` because deliveries coming out
//! of the lobby are addressed by client id.

use std::collections::HashMap;
use std::sync::Arc;

use rooms_core::{ClientId, ClientRequest, ServerEvent};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Outbound events from the lobby to a given client.
pub type OutboundTx = mpsc::UnboundedSender<ServerEvent>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerEvent>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ClientId`
/// - Value: `OutboundTx` to send `ServerEvent`s to that client.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// Message flowing from a client task into the central lobby task.
///
/// A disconnect is a message like any other so that room cleanup is
/// serialized with normal request handling.
#[derive(Debug)]
pub enum LobbyRequest {
    /// A decoded request from a connected client.
    Message {
        client: ClientId,
        request: ClientRequest,
    },
    /// The client's connection ended (EOF, read error, or oversized line).
    Disconnected { client: ClientId },
}

/// Channel from clients → lobby task.
pub type LobbyTx = mpsc::UnboundedSender<LobbyRequest>;
pub type LobbyRx = mpsc::UnboundedReceiver<LobbyRequest>;
