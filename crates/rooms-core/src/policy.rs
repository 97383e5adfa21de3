//! Seat color assignment.
//!
//! Assignment is a pure function of the seat already taken (if any), the
//! joiner's stated preference, and the room's configured policy. Rooms
//! call it exactly once per seating, so swapping the policy never
//! touches the join flow itself.

use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::color::Color;
use crate::messages::ColorChoice;

/// How a room picks the color of the first seat when the creator states
/// no preference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    /// First player seated gets White.
    #[default]
    FirstWhite,
    /// First player seated gets a coin flip.
    Random,
}

/// Error parsing a [`ColorPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color policy {0:?} (expected \"first_white\" or \"random\")")]
pub struct ParseColorPolicyError(String);

impl FromStr for ColorPolicy {
    type Err = ParseColorPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_white" => Ok(ColorPolicy::FirstWhite),
            "random" => Ok(ColorPolicy::Random),
            other => Err(ParseColorPolicyError(other.to_string())),
        }
    }
}

/// Pick the color for the next seat.
///
/// A partner already seated fixes the answer: the second seat always
/// takes the remaining color, preference or not.
pub fn assign_color<R: Rng>(
    taken: Option<Color>,
    preference: Option<ColorChoice>,
    policy: ColorPolicy,
    rng: &mut R,
) -> Color {
    if let Some(existing) = taken {
        return existing.opposite();
    }
    match preference {
        Some(ColorChoice::White) => Color::White,
        Some(ColorChoice::Black) => Color::Black,
        Some(ColorChoice::Random) => coin_flip(rng),
        None => match policy {
            ColorPolicy::FirstWhite => Color::White,
            ColorPolicy::Random => coin_flip(rng),
        },
    }
}

fn coin_flip<R: Rng>(rng: &mut R) -> Color {
    if rng.gen_bool(0.5) {
        Color::White
    } else {
        Color::Black
    }
}
