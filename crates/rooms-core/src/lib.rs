//! rooms-core
//!
//! Pure multiplayer game-room logic:
//! - messages (request/event types and per-connection deliveries)
//! - rules-engine adapter (position, legality, terminal detection)
//! - per-game room (seats, spectators, history, rematch handshake)
//! - room registry (id generation, delete-when-empty)
//! - lobby (session bindings and request dispatch)

pub mod color;
pub mod error;
pub mod ids;
pub mod lobby;
pub mod messages;
pub mod policy;
pub mod registry;
pub mod room;
pub mod rules;
pub mod snapshot;

pub use color::Color;
pub use error::RoomError;
pub use ids::{ClientId, RoomId, RoomIdError};

pub use messages::{
    ClientRequest,
    ColorChoice,
    Delivery,
    LegalMove,
    MoveRequest,
    Role,
    ServerEvent,
};

pub use lobby::Lobby;
pub use policy::{assign_color, ColorPolicy, ParseColorPolicyError};
pub use registry::RoomRegistry;
pub use room::{Membership, PlayerSeat, Room, Spectator, MAX_PLAYERS};
pub use rules::{MoveReject, Position, PositionStatus};
pub use snapshot::{GameSnapshot, MoveRecord, PlayerInfo, Promotion, Winner};
