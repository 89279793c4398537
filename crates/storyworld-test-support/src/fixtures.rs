//! Canonical test data.

use chrono::{DateTime, TimeZone, Utc};
use storyworld_core::entity::Character;
use uuid::Uuid;

/// Fixed timestamp used across tests.
///
/// # Panics
///
/// Never; the date is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A character with the given name and description and a fixed id outside
/// the range `SequenceIdGenerator` hands out in tests.
#[must_use]
pub fn sample_character(name: &str, description: &str) -> Character {
    Character {
        id: Uuid::from_u128(0xC0DE_0000),
        name: name.to_owned(),
        description: description.to_owned(),
        personality: None,
        backstory: None,
        avatar: "🧑‍💻".to_owned(),
        world: "Cyber Tokyo 2099".to_owned(),
        traits: None,
    }
}
