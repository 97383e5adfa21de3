//! The lobby: gateway state machine and dispatch.
//!
//! One `Lobby` owns the room registry plus the binding of every live
//! connection to its room, role, and color. [`Lobby::handle`] maps one
//! inbound request to the complete list of [`Delivery`]s it produces,
//! honoring the routing rule:
//!
//! - acknowledgments and query responses go to the requester only,
//! - state-changing broadcasts go to the whole room,
//! - negotiation notices go to the room minus the requester.
//!
//! The lobby is purely synchronous and single-writer by construction;
//! the server drives it from one task and fans the deliveries out.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Color;
use crate::error::RoomError;
use crate::ids::{ClientId, RoomId};
use crate::messages::{ClientRequest, ColorChoice, Delivery, MoveRequest, Role, ServerEvent};
use crate::policy::ColorPolicy;
use crate::registry::RoomRegistry;
use crate::room::Membership;

/// Which seat (if any) a bound connection holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SessionRole {
    Player(Color),
    Spectator,
}

/// Where a connection currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    room_id: RoomId,
    role: SessionRole,
}

/// Every room and every session binding, behind one owner.
pub struct Lobby {
    registry: RoomRegistry,
    sessions: HashMap<ClientId, Binding>,
    policy: ColorPolicy,
    rng: StdRng,
}

impl Lobby {
    pub fn new(policy: ColorPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    /// Deterministic lobby for tests: seeded id generation and coin flips.
    pub fn seeded(policy: ColorPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: ColorPolicy, rng: StdRng) -> Self {
        Lobby {
            registry: RoomRegistry::new(),
            sessions: HashMap::new(),
            policy,
            rng,
        }
    }

    /// Process one request from `client` and return every event to send,
    /// each addressed to its recipient, in delivery order.
    pub fn handle(&mut self, client: ClientId, request: ClientRequest) -> Vec<Delivery> {
        match request {
            ClientRequest::CreateRoom {
                player_name,
                pin,
                color,
            } => self.create_room(client, player_name, pin, color),
            ClientRequest::JoinRoom {
                room_id,
                player_name,
                pin,
            } => self.join_room(client, room_id, player_name, pin),
            ClientRequest::MakeMove { mv } => self.make_move(client, mv),
            ClientRequest::GetLegalMoves { square } => self.legal_moves(client, square),
            ClientRequest::ResetGame => self.reset_game(client),
            ClientRequest::ResetConfirmed => self.reset_confirmed(client),
            ClientRequest::ResetDeclined => self.reset_declined(client),
        }
    }

    /// Transport closed: unbind, remove from the room, notify the rest,
    /// and delete the room when it just became empty.
    pub fn disconnect(&mut self, client: ClientId) -> Vec<Delivery> {
        let Some(binding) = self.sessions.remove(&client) else {
            return Vec::new();
        };
        let room_id = binding.room_id;
        let Some(room) = self.registry.get_mut(&room_id) else {
            return Vec::new();
        };
        let removed = room.remove_member(client);
        let mut out = Vec::new();
        if let Some(role) = removed {
            let message = match role {
                Role::Player => "Opponent disconnected",
                Role::Spectator => "Spectator disconnected",
            };
            for member in room.member_ids() {
                out.push(Delivery::new(
                    member,
                    ServerEvent::PlayerDisconnected {
                        message: message.to_string(),
                    },
                ));
            }
        }
        self.registry.delete_if_empty(&room_id);
        out
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    // -------------------------------------------------------------------------
    // Request handlers
    // -------------------------------------------------------------------------

    fn create_room(
        &mut self,
        client: ClientId,
        name: Option<String>,
        pin: Option<String>,
        choice: Option<ColorChoice>,
    ) -> Vec<Delivery> {
        if self.sessions.contains_key(&client) {
            return reject(client, RoomError::MalformedRequest("already in a room".into()));
        }
        let policy = self.policy;
        let room = self.registry.create(pin.clone(), policy, &mut self.rng);
        let room_id = room.id().clone();
        let membership = match room.add_member(client, name, pin.as_deref(), choice, &mut self.rng)
        {
            Ok(membership) => membership,
            Err(err) => return reject(client, err),
        };
        let Membership::Player(color) = membership else {
            return vec![Delivery::new(
                client,
                ServerEvent::server_error("failed to seat room creator"),
            )];
        };
        let snapshot = room.snapshot();
        self.sessions.insert(
            client,
            Binding {
                room_id: room_id.clone(),
                role: SessionRole::Player(color),
            },
        );
        vec![Delivery::new(
            client,
            ServerEvent::RoomCreated {
                room_id,
                pin,
                color,
                role: Role::Player,
                game_state: snapshot,
            },
        )]
    }

    fn join_room(
        &mut self,
        client: ClientId,
        raw_id: String,
        name: Option<String>,
        pin: Option<String>,
    ) -> Vec<Delivery> {
        if self.sessions.contains_key(&client) {
            return reject(client, RoomError::MalformedRequest("already in a room".into()));
        }
        let Ok(room_id) = RoomId::parse(&raw_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        let membership = match room.add_member(client, name, pin.as_deref(), None, &mut self.rng) {
            Ok(membership) => membership,
            Err(err) => return reject(client, err),
        };
        match membership {
            Membership::Player(color) => {
                let snapshot = room.snapshot();
                let full = room.is_full();
                let members = room.member_ids();
                self.sessions.insert(
                    client,
                    Binding {
                        room_id,
                        role: SessionRole::Player(color),
                    },
                );
                let mut out = vec![Delivery::new(
                    client,
                    ServerEvent::YourColor {
                        color,
                        role: Role::Player,
                        game_state: snapshot.clone(),
                    },
                )];
                if full {
                    for member in members {
                        out.push(Delivery::new(
                            member,
                            ServerEvent::GameStart {
                                game_state: snapshot.clone(),
                            },
                        ));
                    }
                }
                out
            }
            Membership::Spectator => {
                let snapshot = room.snapshot();
                self.sessions.insert(
                    client,
                    Binding {
                        room_id: room_id.clone(),
                        role: SessionRole::Spectator,
                    },
                );
                vec![Delivery::new(
                    client,
                    ServerEvent::JoinedAsSpectator {
                        room_id,
                        game_state: snapshot,
                    },
                )]
            }
        }
    }

    fn make_move(&mut self, client: ClientId, mv: MoveRequest) -> Vec<Delivery> {
        let (room_id, color) = match self.player_seat(client) {
            Ok(seat) => seat,
            Err(err) => return reject(client, err),
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        match room.apply_move(color, &mv) {
            Ok(record) => {
                let snapshot = room.snapshot();
                room.member_ids()
                    .into_iter()
                    .map(|member| {
                        Delivery::new(
                            member,
                            ServerEvent::GameUpdate {
                                mv: record.clone(),
                                game_state: snapshot.clone(),
                            },
                        )
                    })
                    .collect()
            }
            Err(err) => reject(client, err),
        }
    }

    fn legal_moves(&mut self, client: ClientId, square: String) -> Vec<Delivery> {
        let room_id = match self.member_room(client) {
            Ok(room_id) => room_id,
            Err(err) => return reject(client, err),
        };
        let Some(room) = self.registry.get(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        match room.legal_moves(&square) {
            Ok(moves) => vec![Delivery::new(
                client,
                ServerEvent::LegalMoves { square, moves },
            )],
            Err(err) => reject(client, err),
        }
    }

    fn reset_game(&mut self, client: ClientId) -> Vec<Delivery> {
        let (room_id, color) = match self.player_seat(client) {
            Ok(seat) => seat,
            Err(err) => return reject(client, err),
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        room.request_reset(color);
        room.member_ids()
            .into_iter()
            .filter(|member| *member != client)
            .map(|member| {
                Delivery::new(member, ServerEvent::ResetRequest { requested_by: color })
            })
            .collect()
    }

    fn reset_confirmed(&mut self, client: ClientId) -> Vec<Delivery> {
        let (room_id, color) = match self.player_seat(client) {
            Ok(seat) => seat,
            Err(err) => return reject(client, err),
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        match room.confirm_reset(color) {
            Ok(()) => {
                let snapshot = room.snapshot();
                room.member_ids()
                    .into_iter()
                    .map(|member| {
                        Delivery::new(
                            member,
                            ServerEvent::GameReset {
                                game_state: snapshot.clone(),
                            },
                        )
                    })
                    .collect()
            }
            Err(err) => reject(client, err),
        }
    }

    fn reset_declined(&mut self, client: ClientId) -> Vec<Delivery> {
        let (room_id, _) = match self.player_seat(client) {
            Ok(seat) => seat,
            Err(err) => return reject(client, err),
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return reject(client, RoomError::RoomNotFound);
        };
        match room.decline_reset() {
            Some(requester) => match room.player_by_color(requester) {
                Some(seat) => vec![Delivery::new(seat.conn, ServerEvent::ResetDeclined)],
                None => Vec::new(),
            },
            None => reject(client, RoomError::ResetNotPending),
        }
    }

    // -------------------------------------------------------------------------
    // Binding lookups
    // -------------------------------------------------------------------------

    /// The requester's room and color, or why they may not act as a player.
    fn player_seat(&self, client: ClientId) -> Result<(RoomId, Color), RoomError> {
        match self.sessions.get(&client) {
            None => Err(RoomError::Unauthorized("you are not in a room".into())),
            Some(binding) => match binding.role {
                SessionRole::Player(color) => Ok((binding.room_id.clone(), color)),
                SessionRole::Spectator => Err(RoomError::Unauthorized(
                    "you are not a player in this room".into(),
                )),
            },
        }
    }

    fn member_room(&self, client: ClientId) -> Result<RoomId, RoomError> {
        self.sessions
            .get(&client)
            .map(|binding| binding.room_id.clone())
            .ok_or_else(|| RoomError::Unauthorized("you are not in a room".into()))
    }
}

fn reject(client: ClientId, err: RoomError) -> Vec<Delivery> {
    vec![Delivery::new(client, ServerEvent::error(&err))]
}
