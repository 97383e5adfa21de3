//! Per-connection I/O.
//!
//! Each connection gets two halves:
//! - a reader loop (this task) that assembles newline-delimited JSON
//!   requests and forwards them to the lobby loop
//! - a writer task that drains the client's outbound channel and writes
//!   one JSON line per event
//!
//! Requests that fail to decode are answered directly with an `error`
//! event; they never reach the lobby. Whatever ends the reader loop
//! (EOF, read error, oversized line), the client is removed from the
//! registry and the lobby is told to release its room membership.

use anyhow::{anyhow, Result};
use rooms_core::ClientId;
use rooms_protocol::{json_codec, MAX_LINE_LEN};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{tcp::OwnedWriteHalf, TcpStream};
use tracing::{debug, warn};

use crate::types::{ClientRegistry, LobbyRequest, LobbyTx, OutboundRx, OutboundTx};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    lobby_tx: LobbyTx,
    out_tx: OutboundTx,
    mut out_rx: OutboundRx,
    clients: ClientRegistry,
) -> Result<()> {
    let _peer_addr = stream.peer_addr().ok();

    let (mut read_stream, write_stream) = stream.into_split();

    // Writer task: consume ServerEvents and write them as JSON lines.
    let _writer_handle = tokio::spawn(async move {
        let mut write_stream = write_stream;

        while let Some(event) = out_rx.recv().await {
            if let Err(e) = write_event(&mut write_stream, &event).await {
                debug!(client = client_id.0, error = %e, "write error");
                break;
            }
        }
    });

    let mut buffer = Vec::new();
    let mut temp_buf = [0u8; 1024];

    let result: Result<()> = 'read: loop {
        match read_stream.read(&mut temp_buf).await {
            Ok(0) => {
                // EOF, client hung up.
                debug!(client = client_id.0, "disconnected");
                break 'read Ok(());
            }
            Ok(n) => {
                buffer.extend_from_slice(&temp_buf[..n]);

                // Process complete lines.
                while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let raw = buffer.drain(..=newline_pos).collect::<Vec<u8>>();
                    let text = String::from_utf8_lossy(&raw);
                    let line = text.trim();

                    if line.is_empty() {
                        continue;
                    }

                    debug!(client = client_id.0, line, "received");

                    match json_codec::decode_request(line) {
                        Ok(request) => {
                            let req = LobbyRequest::Message {
                                client: client_id,
                                request,
                            };
                            if lobby_tx.send(req).is_err() {
                                warn!(client = client_id.0, "lobby channel closed");
                                break 'read Ok(());
                            }
                        }
                        Err(err) => {
                            debug!(client = client_id.0, error = %err, "malformed request");
                            let _ = out_tx.send(json_codec::error_event(&err));
                        }
                    }
                }

                // A partial line still growing past the cap means the peer
                // is not speaking the line protocol. Cut it off.
                if buffer.len() > MAX_LINE_LEN {
                    let _ = out_tx.send(json_codec::oversized_line_event());
                    break 'read Err(anyhow!(
                        "client {} exceeded {} bytes without a newline",
                        client_id.0,
                        MAX_LINE_LEN
                    ));
                }
            }
            Err(e) => {
                debug!(client = client_id.0, error = %e, "read error");
                break 'read Err(e.into());
            }
        }
    };

    // Remove client from registry, then let the lobby release the seat.
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }
    let _ = lobby_tx.send(LobbyRequest::Disconnected { client: client_id });

    result
}

async fn write_event(
    stream: &mut OwnedWriteHalf,
    event: &rooms_core::ServerEvent,
) -> Result<()> {
    let line = json_codec::encode_event(event)?;

    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;

    Ok(())
}
