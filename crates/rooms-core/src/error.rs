//! Error taxonomy for room and lobby operations.
//!
//! Every rejected request maps to exactly one of these kinds. The wire
//! layer turns a [`RoomError`] into an `error` event carrying a stable
//! machine-readable code plus a human-readable message, so clients can
//! branch on the code and show the message as-is.

use thiserror::Error;

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// No room exists under the given id.
    #[error("room not found")]
    RoomNotFound,

    /// The room is PIN-protected and the provided PIN did not match.
    #[error("incorrect PIN")]
    AccessDenied,

    /// A seated player tried to move out of turn.
    #[error("not your turn")]
    TurnViolation,

    /// The move is not legal in the current position, or the game is
    /// already over.
    #[error("{0}")]
    IllegalMove(String),

    /// The sender's role does not permit this action (e.g. a spectator
    /// trying to move, or a connection that is not in a room at all).
    #[error("{0}")]
    Unauthorized(String),

    /// The request was syntactically valid JSON but semantically unusable.
    #[error("{0}")]
    MalformedRequest(String),

    /// A reset confirmation or decline arrived with no matching pending
    /// reset request.
    #[error("no reset request is pending")]
    ResetNotPending,
}

impl RoomError {
    /// Stable machine-readable code for the wire `error` event.
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::RoomNotFound => "room_not_found",
            RoomError::AccessDenied => "access_denied",
            RoomError::TurnViolation => "turn_violation",
            RoomError::IllegalMove(_) => "illegal_move",
            RoomError::Unauthorized(_) => "unauthorized",
            RoomError::MalformedRequest(_) => "malformed_request",
            RoomError::ResetNotPending => "reset_not_pending",
        }
    }
}
