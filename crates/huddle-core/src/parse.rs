//! Availability token classification
//!
//! Precedence, first match wins:
//! 1. Recorded absence (applied by the caller via [`player_availability`])
//! 2. `HH:MM-HH:MM` with `start < end`
//! 3. `x` / `X`
//! 4. Empty or whitespace
//!
//! Anything else degrades to "no response". Parsing never fails.

use huddle_api::{Availability, PlayerAvailability, RosterMember};
use huddle_util::TokenShape;
use tracing::debug;

/// Canonical raw value written for players on leave
pub const ABSENT_RAW_VALUE: &str = "absent";

/// How a token was recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Available,
    Unavailable,
    NoResponse,
    /// Non-empty but unusable (bad shape, empty or inverted range)
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedToken {
    pub availability: Availability,
    pub class: TokenClass,
}

impl ParsedToken {
    fn unset(class: TokenClass) -> Self {
        Self {
            availability: Availability::Unset,
            class,
        }
    }
}

/// Classify a raw availability token.
pub fn parse_token(raw: &str) -> ParsedToken {
    match TokenShape::classify(raw) {
        TokenShape::Range(range) => ParsedToken {
            availability: Availability::Available(range),
            class: TokenClass::Available,
        },
        TokenShape::Unavailable => ParsedToken {
            availability: Availability::Unavailable,
            class: TokenClass::Unavailable,
        },
        TokenShape::Empty => ParsedToken::unset(TokenClass::NoResponse),
        TokenShape::Invalid => {
            debug!(token = raw.trim(), "Unrecognised availability token treated as no response");
            ParsedToken::unset(TokenClass::Invalid)
        }
    }
}

/// Force a player onto leave, overriding whatever they entered.
pub fn apply_absence(player: &mut PlayerAvailability) {
    player.raw_value = ABSENT_RAW_VALUE.to_string();
    player.availability = Availability::Absent;
}

/// Build a player's availability for a day from their resolved raw value.
pub fn player_availability(member: &RosterMember, raw_value: &str, absent: bool) -> PlayerAvailability {
    let mut player = PlayerAvailability {
        user_id: member.user_id.clone(),
        display_name: member.display_name.clone(),
        role: member.role,
        raw_value: raw_value.to_string(),
        availability: parse_token(raw_value).availability,
        sort_order: member.sort_order,
    };

    if absent {
        apply_absence(&mut player);
    }
    player
}
