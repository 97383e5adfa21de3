//! Message types used by the lobby.
//!
//! These are **transport-agnostic** logical messages:
//! - [`ClientRequest`]: what the lobby consumes.
//! - [`ServerEvent`]: what the lobby produces.
//! - [`Delivery`]: one event addressed to one connection.
//!
//! The serde derives define the JSON shape of each message (externally the
//! protocol is tagged with `"type"` and uses camelCase field names), but
//! framing, sanitization, and encoding live in the `rooms-protocol` crate;
//! this module is purely logical.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::RoomError;
use crate::ids::{ClientId, RoomId};
use crate::snapshot::{GameSnapshot, MoveRecord, Promotion};

/// Seat preference a room creator may express.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    White,
    Black,
    Random,
}

/// What a member of a room is allowed to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Seated with move authority over one color.
    Player,
    /// Receives every broadcast but cannot act on the game.
    Spectator,
}

/// A candidate move as sent by a client. Squares are algebraic
/// coordinates; legality is entirely the rules engine's call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

/// A high-level request into the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientRequest {
    /// Create a room and take the first seat.
    CreateRoom {
        #[serde(default)]
        player_name: Option<String>,
        /// Optional access PIN; when set, joiners must present it.
        #[serde(default)]
        pin: Option<String>,
        /// Seat color preference for the creator.
        #[serde(default)]
        color: Option<ColorChoice>,
    },

    /// Join an existing room, as the second player if a seat is free,
    /// otherwise as a spectator.
    JoinRoom {
        room_id: String,
        #[serde(default)]
        player_name: Option<String>,
        #[serde(default)]
        pin: Option<String>,
    },

    /// Submit a move in the sender's current room.
    MakeMove {
        #[serde(rename = "move")]
        mv: MoveRequest,
    },

    /// Ask for the legal moves from one square.
    GetLegalMoves { square: String },

    /// Ask the opponent for a rematch.
    ResetGame,

    /// Accept the opponent's pending rematch request.
    ResetConfirmed,

    /// Turn down the opponent's pending rematch request.
    ResetDeclined,
}

/// One legal move from a queried square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMove {
    /// Destination square.
    pub to: String,
    /// Whether the move would capture.
    pub captured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

/// A high-level event emitted by the lobby.
///
/// Who receives each event is decided by the lobby when it builds
/// [`Delivery`] lists; the variants themselves carry no addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Room created; sent to the creator only.
    RoomCreated {
        room_id: RoomId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pin: Option<String>,
        color: Color,
        role: Role,
        game_state: GameSnapshot,
    },

    /// Seat assignment for a player who just joined.
    YourColor {
        color: Color,
        role: Role,
        game_state: GameSnapshot,
    },

    /// Both seats are filled; the game is on. Sent to the whole room.
    GameStart { game_state: GameSnapshot },

    /// Join acknowledgement for a spectator.
    JoinedAsSpectator {
        room_id: RoomId,
        game_state: GameSnapshot,
    },

    /// A move was applied. Sent to the whole room.
    GameUpdate {
        #[serde(rename = "move")]
        mv: MoveRecord,
        game_state: GameSnapshot,
    },

    /// Answer to a legal-moves query; sent to the requester only.
    LegalMoves {
        square: String,
        moves: Vec<LegalMove>,
    },

    /// The opponent asks for a rematch. Sent to everyone in the room
    /// except the requester.
    ResetRequest { requested_by: Color },

    /// The board was reset for a rematch. Sent to the whole room.
    GameReset { game_state: GameSnapshot },

    /// The rematch request was turned down; sent to the requester only.
    ResetDeclined,

    /// A member's connection dropped. Sent to the remaining members.
    PlayerDisconnected { message: String },

    /// A request was rejected. Sent to the requester only.
    Error { code: String, message: String },
}

/// One event addressed to one connection.
///
/// The lobby returns a list of these per request; the networking layer
/// just looks up each target's outbound channel and forwards the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ClientId,
    pub event: ServerEvent,
}

impl Delivery {
    pub fn new(to: ClientId, event: ServerEvent) -> Self {
        Delivery { to, event }
    }
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl ServerEvent {
    /// Convenience constructor for an error event from a [`RoomError`].
    pub fn error(err: &RoomError) -> Self {
        ServerEvent::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// Convenience constructor for an internal server error event.
    pub fn server_error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            code: "server_error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_event_carries_code_and_message() {
        let event = ServerEvent::error(&RoomError::TurnViolation);
        assert_eq!(
            event,
            ServerEvent::Error {
                code: "turn_violation".into(),
                message: "not your turn".into(),
            }
        );
    }

    #[test]
    fn server_error_uses_reserved_code() {
        let event = ServerEvent::server_error("internal server error");
        match event {
            ServerEvent::Error { code, message } => {
                assert_eq!(code, "server_error");
                assert_eq!(message, "internal server error");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
