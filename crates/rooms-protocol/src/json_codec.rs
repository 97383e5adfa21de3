//! Newline-delimited JSON codec.
//!
//! One protocol message per line, each a single JSON object tagged by a
//! `"type"` field:
//!
//! ```text
//! {"type":"create_room","playerName":"alice","pin":"1234"}
//! {"type":"join_room","roomId":"AB12CD","playerName":"bob"}
//! {"type":"make_move","move":{"from":"e2","to":"e4","promotion":"q"}}
//! {"type":"get_legal_moves","square":"e2"}
//! {"type":"reset_game"}
//! ```
//!
//! Decoding also applies the sanitizers from [`crate::wire`], so the
//! lobby only ever sees bounded, markup-free display fields.

use rooms_core::{ClientRequest, ServerEvent};
use thiserror::Error;

use crate::wire;

/// Decode or encode failure at the protocol boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line was not a valid request object.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// An outbound event failed to serialize.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Parse one line into a sanitized [`ClientRequest`]. The caller strips
/// framing (the trailing newline) and skips blank lines.
pub fn decode_request(line: &str) -> Result<ClientRequest, ProtocolError> {
    let request = serde_json::from_str::<ClientRequest>(line.trim())
        .map_err(|err| ProtocolError::Malformed(err.to_string()))?;
    Ok(wire::sanitize_request(request))
}

/// Encode one event as a single JSON line, without the trailing newline.
pub fn encode_event(event: &ServerEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|err| ProtocolError::Encode(err.to_string()))
}

/// The error event sent straight back for a line that would not decode.
pub fn error_event(err: &ProtocolError) -> ServerEvent {
    ServerEvent::Error {
        code: "malformed_request".to_string(),
        message: err.to_string(),
    }
}

/// The parting error event for a connection whose current line grew past
/// [`wire::MAX_LINE_LEN`] without a newline.
pub fn oversized_line_event() -> ServerEvent {
    ServerEvent::Error {
        code: "malformed_request".to_string(),
        message: format!("request line exceeds {} bytes", wire::MAX_LINE_LEN),
    }
}
