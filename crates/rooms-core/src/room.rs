//! A single game room.
//!
//! A room owns:
//! - up to two seated players plus any number of spectators,
//! - the authoritative [`Position`],
//! - the move history and terminal state,
//! - at most one pending rematch request.
//!
//! Rooms identify members only by [`ClientId`]; picking the audience for
//! an event and delivering it are the lobby's job.

use rand::Rng;

use crate::color::Color;
use crate::error::RoomError;
use crate::ids::{ClientId, RoomId};
use crate::messages::{ColorChoice, LegalMove, MoveRequest, Role};
use crate::policy::{assign_color, ColorPolicy};
use crate::rules::{MoveReject, Position, PositionStatus};
use crate::snapshot::{GameSnapshot, MoveRecord, PlayerInfo, Winner};

/// Maximum number of seated players per room.
pub const MAX_PLAYERS: usize = 2;

/// A seated player with move authority over one color.
#[derive(Debug, Clone)]
pub struct PlayerSeat {
    pub conn: ClientId,
    pub color: Color,
    pub name: String,
}

/// A watching member.
#[derive(Debug, Clone)]
pub struct Spectator {
    pub conn: ClientId,
    pub name: String,
}

/// What a newly admitted member became.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Membership {
    Player(Color),
    Spectator,
}

impl Membership {
    pub fn role(self) -> Role {
        match self {
            Membership::Player(_) => Role::Player,
            Membership::Spectator => Role::Spectator,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
struct Terminal {
    is_over: bool,
    winner: Option<Winner>,
}

/// One room: seats, spectators, position, history, rematch token.
pub struct Room {
    id: RoomId,
    pin: Option<String>,
    policy: ColorPolicy,
    position: Position,
    players: Vec<PlayerSeat>,
    spectators: Vec<Spectator>,
    history: Vec<MoveRecord>,
    terminal: Terminal,
    /// Color that asked for a rematch, while the request is open.
    pending_reset: Option<Color>,
}

impl Room {
    pub fn new(id: RoomId, pin: Option<String>, policy: ColorPolicy) -> Self {
        Room {
            id,
            pin,
            policy,
            position: Position::new(),
            players: Vec::new(),
            spectators: Vec::new(),
            history: Vec::new(),
            terminal: Terminal::default(),
            pending_reset: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// The PIN echoed back to the creator, if the room has one.
    pub fn pin(&self) -> Option<&str> {
        self.pin.as_deref()
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Admit a connection: onto a free seat while one remains, as a
    /// spectator afterwards. Fails with [`RoomError::AccessDenied`] when
    /// the room has a PIN and `provided_pin` does not match it.
    pub fn add_member<R: Rng>(
        &mut self,
        conn: ClientId,
        name: Option<String>,
        provided_pin: Option<&str>,
        preference: Option<ColorChoice>,
        rng: &mut R,
    ) -> Result<Membership, RoomError> {
        if let Some(pin) = &self.pin {
            if provided_pin != Some(pin.as_str()) {
                return Err(RoomError::AccessDenied);
            }
        }
        let name = name.filter(|n| !n.is_empty());
        if self.players.len() < MAX_PLAYERS {
            let taken = self.players.first().map(|p| p.color);
            let color = assign_color(taken, preference, self.policy, rng);
            let name = name.unwrap_or_else(|| format!("Player {color}"));
            self.players.push(PlayerSeat { conn, color, name });
            Ok(Membership::Player(color))
        } else {
            let name = name.unwrap_or_else(|| "Player".to_string());
            self.spectators.push(Spectator { conn, name });
            Ok(Membership::Spectator)
        }
    }

    /// Drop a connection from the room. Idempotent: removing a stranger
    /// returns `None` and changes nothing. A player leaving cancels any
    /// open rematch request.
    pub fn remove_member(&mut self, conn: ClientId) -> Option<Role> {
        if let Some(idx) = self.players.iter().position(|p| p.conn == conn) {
            self.players.remove(idx);
            self.pending_reset = None;
            return Some(Role::Player);
        }
        if let Some(idx) = self.spectators.iter().position(|s| s.conn == conn) {
            self.spectators.remove(idx);
            return Some(Role::Spectator);
        }
        None
    }

    pub fn player(&self, conn: ClientId) -> Option<&PlayerSeat> {
        self.players.iter().find(|p| p.conn == conn)
    }

    pub fn player_by_color(&self, color: Color) -> Option<&PlayerSeat> {
        self.players.iter().find(|p| p.color == color)
    }

    pub fn players(&self) -> &[PlayerSeat] {
        &self.players
    }

    /// Every member connection, players first.
    pub fn member_ids(&self) -> Vec<ClientId> {
        self.players
            .iter()
            .map(|p| p.conn)
            .chain(self.spectators.iter().map(|s| s.conn))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.spectators.is_empty()
    }

    /// Both seats taken.
    pub fn is_full(&self) -> bool {
        self.players.len() == MAX_PLAYERS
    }

    // -------------------------------------------------------------------------
    // Game
    // -------------------------------------------------------------------------

    /// Apply one move on behalf of the seat holding `acting`.
    ///
    /// Rejections leave the position, history, and terminal state exactly
    /// as they were.
    pub fn apply_move(&mut self, acting: Color, req: &MoveRequest) -> Result<MoveRecord, RoomError> {
        if self.terminal.is_over {
            return Err(RoomError::IllegalMove("game is already over".into()));
        }
        if self.position.turn() != acting {
            return Err(RoomError::TurnViolation);
        }
        let record = self.position.apply(req).map_err(|reject| match reject {
            MoveReject::Malformed(msg) => RoomError::MalformedRequest(msg),
            MoveReject::Illegal => RoomError::IllegalMove("invalid move".into()),
        })?;
        self.history.push(record.clone());
        match self.position.status() {
            PositionStatus::Checkmate => self.finish(Winner::from(acting)),
            PositionStatus::Stalemate => self.finish(Winner::Stalemate),
            PositionStatus::Draw => self.finish(Winner::Draw),
            PositionStatus::Ongoing => {}
        }
        Ok(record)
    }

    pub fn legal_moves(&self, square: &str) -> Result<Vec<LegalMove>, RoomError> {
        self.position.legal_moves_from(square).map_err(|reject| match reject {
            MoveReject::Malformed(msg) => RoomError::MalformedRequest(msg),
            MoveReject::Illegal => RoomError::MalformedRequest("invalid square".into()),
        })
    }

    /// Fresh game on the same board: position, history, and terminal
    /// state go back to the start; membership is untouched.
    pub fn reset(&mut self) {
        self.position.reset();
        self.history.clear();
        self.terminal = Terminal::default();
        self.pending_reset = None;
    }

    // -------------------------------------------------------------------------
    // Rematch negotiation
    // -------------------------------------------------------------------------

    /// Open (or re-open) a rematch request from `requester`. A second
    /// request simply replaces the first.
    pub fn request_reset(&mut self, requester: Color) {
        self.pending_reset = Some(requester);
    }

    /// Accept the open rematch request. Only the opponent of the
    /// requester may accept, and only while a request is open.
    pub fn confirm_reset(&mut self, confirmer: Color) -> Result<(), RoomError> {
        match self.pending_reset {
            Some(requester) if requester == confirmer => Err(RoomError::Unauthorized(
                "you cannot confirm your own reset request".into(),
            )),
            Some(_) => {
                self.reset();
                Ok(())
            }
            None => Err(RoomError::ResetNotPending),
        }
    }

    /// Close the open rematch request, returning who had asked.
    pub fn decline_reset(&mut self) -> Option<Color> {
        self.pending_reset.take()
    }

    pub fn pending_reset(&self) -> Option<Color> {
        self.pending_reset
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    /// The full client-facing state of this room's game.
    pub fn snapshot(&self) -> GameSnapshot {
        let status = self.position.status();
        GameSnapshot {
            fen: self.position.fen(),
            turn: self.position.turn(),
            is_check: self.position.is_check(),
            is_checkmate: status == PositionStatus::Checkmate,
            is_stalemate: status == PositionStatus::Stalemate,
            is_draw: status == PositionStatus::Draw,
            is_game_over: self.terminal.is_over,
            winner: self.terminal.winner,
            players: self
                .players
                .iter()
                .map(|p| PlayerInfo {
                    name: p.name.clone(),
                    color: p.color,
                })
                .collect(),
            move_history: self.history.clone(),
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.terminal = Terminal {
            is_over: true,
            winner: Some(winner),
        };
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
