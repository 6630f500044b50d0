use std::fmt::{self, Display};

use super::hash::Digest;

/// Base names, in selection order. Reordering changes every assigned name.
pub const NAMES: [&str; 16] = [
    "Brave Soul",
    "Healing Heart",
    "Calm Mind",
    "Gentle Spirit",
    "Rising Phoenix",
    "Peaceful Wave",
    "Hopeful Star",
    "Kind Heart",
    "Strong Oak",
    "Quiet Storm",
    "Warm Light",
    "Free Bird",
    "Tender Bloom",
    "Serene Cloud",
    "Golden Sun",
    "Silver Moon",
];

const SUFFIX_MODULUS: u32 = 99;

/// A base name plus a numeric suffix in `1..=99`, e.g. `Kind Heart 85`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayName {
    pub base: &'static str,
    pub suffix: u8,
}

impl DisplayName {
    pub fn derive(user_id: &str, room_id: &str) -> Self {
        Self::from_digest(Digest::of(&format!("{user_id}-{room_id}")))
    }

    pub fn from_digest(digest: Digest) -> Self {
        let base = NAMES[digest.pick(NAMES.len())];
        // (m % 99) + 1 <= 99, always fits
        let suffix = (digest.magnitude() % SUFFIX_MODULUS + 1) as u8;
        Self { base, suffix }
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base, self.suffix)
    }
}

/// Stable pseudonym for `user_id` inside `room_id`.
pub fn derive_display_name(user_id: &str, room_id: &str) -> String {
    DisplayName::derive(user_id, room_id).to_string()
}
