//! Serializable views of a room's game state.
//!
//! A [`GameSnapshot`] is the full picture a client needs to render the
//! board: position, whose turn it is, check/terminal flags, the seated
//! players, and the move history. Rooms rebuild it after every state
//! change and it rides along on most server events.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Piece a pawn promotes to. Serializes as the single letters clients
/// send (`"q"`, `"r"`, `"b"`, `"n"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Promotion {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

/// One applied move, as stored in the history and echoed in updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// Color that made the move.
    pub color: Color,
    /// Source square, e.g. `"e2"`.
    pub from: String,
    /// Destination square, e.g. `"e4"`.
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
    /// Whether the move captured a piece (including en passant).
    pub captured: bool,
    /// Long algebraic notation, e.g. `"e2e4"`, `"e4xd5"`, `"a7xb8=Q"`.
    pub san: String,
}

/// A seated player as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub name: String,
    pub color: Color,
}

/// How a finished game ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
    Stalemate,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

/// Complete client-facing state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Position in Forsyth-Edwards Notation.
    pub fen: String,
    /// Color to move.
    pub turn: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub is_game_over: bool,
    /// `None` while the game is in progress.
    pub winner: Option<Winner>,
    pub players: Vec<PlayerInfo>,
    pub move_history: Vec<MoveRecord>,
}
