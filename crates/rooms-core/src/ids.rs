//! Identifier types shared across the lobby.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in a room id.
pub const ROOM_ID_LEN: usize = 6;

/// Characters a room id may contain. Ids are canonically uppercase.
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Unique id for one client connection, assigned by the server at accept
/// time and never reused for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

/// Canonical (uppercase) room identifier.
///
/// Room ids are short join codes meant to be typed or pasted by people, so
/// lookups are case-insensitive: [`RoomId::parse`] folds input to uppercase
/// before it ever touches the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

/// Why a raw string failed to parse as a room id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomIdError {
    #[error("room id must be {ROOM_ID_LEN} characters, got {0}")]
    Length(usize),
    #[error("room id may only contain 0-9 and A-Z, got {0:?}")]
    Character(char),
}

impl RoomId {
    /// Validate and canonicalize a raw id (trims whitespace, folds case).
    pub fn parse(raw: &str) -> Result<Self, RoomIdError> {
        let raw = raw.trim();
        if raw.chars().count() != ROOM_ID_LEN {
            return Err(RoomIdError::Length(raw.chars().count()));
        }
        let mut id = String::with_capacity(ROOM_ID_LEN);
        for c in raw.chars() {
            let c = c.to_ascii_uppercase();
            if !c.is_ascii_alphanumeric() {
                return Err(RoomIdError::Character(c));
            }
            id.push(c);
        }
        Ok(RoomId(id))
    }

    /// A uniformly random id. Collision handling is the registry's job.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let id = (0..ROOM_ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        RoomId(id)
    }

    /// Deterministic id derived from a nanosecond timestamp (base-36,
    /// last [`ROOM_ID_LEN`] digits). Fallback when random generation keeps
    /// colliding.
    pub fn from_nanos(nanos: u128) -> Self {
        let mut digits = [0u8; ROOM_ID_LEN];
        let mut rest = nanos;
        for slot in digits.iter_mut().rev() {
            *slot = ALPHABET[(rest % 36) as usize];
            rest /= 36;
        }
        RoomId(digits.iter().map(|&b| b as char).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_canonicalizes_case_and_whitespace() {
        let id = RoomId::parse("  ab12cd ").unwrap();
        assert_eq!(id.as_str(), "AB12CD");
        assert_eq!(RoomId::parse("AB12CD").unwrap(), id);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(RoomId::parse("ABC").unwrap_err(), RoomIdError::Length(3));
        assert_eq!(
            RoomId::parse("ABCDEFG").unwrap_err(),
            RoomIdError::Length(7)
        );
        assert_eq!(RoomId::parse("").unwrap_err(), RoomIdError::Length(0));
    }

    #[test]
    fn parse_rejects_bad_characters() {
        assert_eq!(
            RoomId::parse("AB-12D").unwrap_err(),
            RoomIdError::Character('-')
        );
        assert!(RoomId::parse("AB√12D").is_err());
    }

    #[test]
    fn random_ids_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let id = RoomId::random(&mut rng);
            assert_eq!(id.as_str().len(), ROOM_ID_LEN);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn from_nanos_pads_small_values() {
        assert_eq!(RoomId::from_nanos(0).as_str(), "000000");
        assert_eq!(RoomId::from_nanos(35).as_str(), "00000Z");
        assert_eq!(RoomId::from_nanos(36).as_str(), "000010");
    }

    #[test]
    fn from_nanos_keeps_low_digits() {
        let a = RoomId::from_nanos(1_700_000_000_000_000_000);
        let b = RoomId::from_nanos(1_700_000_000_000_000_001);
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), ROOM_ID_LEN);
    }
}
