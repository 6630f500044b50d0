//! Anonymous identities for room members.
//!
//! Every (user, room) pair maps to a stable pseudonym such as `Calm Mind 17`.
//! Any display name can then be turned into avatar hints (initials and a color
//! token). Everything here is pure: same input, same output, no state.

mod avatar;
mod hash;
mod name;

pub use avatar::{derive_avatar_color, derive_initials, AvatarPresentation, COLORS};
pub use hash::Digest;
pub use name::{derive_display_name, DisplayName, NAMES};

use serde::Serialize;

/// What a room member is shown as: the derived name plus its avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymousIdentity {
    pub display_name: String,
    pub initials: String,
    pub color: &'static str,
}

impl AnonymousIdentity {
    pub fn derive(user_id: &str, room_id: &str) -> Self {
        let display_name = derive_display_name(user_id, room_id);
        let AvatarPresentation { initials, color } = AvatarPresentation::for_name(&display_name);
        Self { display_name, initials, color }
    }
}
