//! Process-wide room registry.
//!
//! Maps canonical room ids to live rooms and owns id generation:
//! random ids with a bounded number of collision retries, then a
//! timestamp-derived fallback that is nudged forward until it is free.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::ids::RoomId;
use crate::policy::ColorPolicy;
use crate::room::Room;

/// How many random ids to try before falling back to the clock.
const ID_ATTEMPTS: usize = 100;

/// All rooms currently alive, keyed by canonical id.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry {
            rooms: HashMap::new(),
        }
    }

    /// Create a room under a freshly generated id and return it.
    pub fn create<R: Rng>(
        &mut self,
        pin: Option<String>,
        policy: ColorPolicy,
        rng: &mut R,
    ) -> &mut Room {
        let id = self.fresh_id(rng);
        self.rooms
            .entry(id)
            .or_insert_with_key(|id| Room::new(id.clone(), pin, policy))
    }

    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn get_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    /// Drop the room if its last member is gone. Returns whether the
    /// room was deleted.
    pub fn delete_if_empty(&mut self, id: &RoomId) -> bool {
        match self.rooms.get(id) {
            Some(room) if room.is_empty() => {
                self.rooms.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// An id no live room is using.
    fn fresh_id<R: Rng>(&self, rng: &mut R) -> RoomId {
        for _ in 0..ID_ATTEMPTS {
            let id = RoomId::random(rng);
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
        let mut nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        loop {
            let id = RoomId::from_nanos(nanos);
            if !self.rooms.contains_key(&id) {
                return id;
            }
            nanos = nanos.wrapping_add(1);
        }
    }
}
