use serde::Serialize;

use super::hash::Digest;

/// Avatar background tokens, in selection order.
pub const COLORS: [&str; 10] = [
    "bg-blue-500",
    "bg-green-500",
    "bg-purple-500",
    "bg-pink-500",
    "bg-indigo-500",
    "bg-teal-500",
    "bg-orange-500",
    "bg-cyan-500",
    "bg-rose-500",
    "bg-amber-500",
];

/// Rendering hints for a display name. Depends only on the name itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarPresentation {
    pub initials: String,
    pub color: &'static str,
}

impl AvatarPresentation {
    pub fn for_name(display_name: &str) -> Self {
        Self {
            initials: derive_initials(display_name),
            color: derive_avatar_color(display_name),
        }
    }
}

/// Two uppercase initials: first letters of the first two space-separated
/// words, or the first two characters when there is only one word.
///
/// Empty input gives an empty string. An empty word (doubled or trailing
/// space) contributes no letter.
pub fn derive_initials(display_name: &str) -> String {
    let mut words = display_name.split(' ');
    match (words.next(), words.next()) {
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
        _ => display_name.chars().take(2).flat_map(char::to_uppercase).collect(),
    }
}

pub fn derive_avatar_color(display_name: &str) -> &'static str {
    COLORS[Digest::of(display_name).pick(COLORS.len())]
}
