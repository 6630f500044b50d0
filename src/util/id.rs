//! Room ids and invite tokens.

use rand::{distributions::Alphanumeric, Rng};
use ulid::Ulid;

const INVITE_TOKEN_LEN: usize = 20;

/// Room id: a lowercase ULID. The leading timestamp alone is not unique.
pub fn new_room_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

/// URL-safe alphanumeric invite token.
pub fn new_invite_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_ids_are_unique_ulids() {
        let id = new_room_id();
        assert_eq!(id.len(), 26);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, new_room_id());
    }

    #[test]
    fn invite_tokens_are_random() {
        let a = new_invite_token();
        let b = new_invite_token();
        assert_eq!(a.len(), INVITE_TOKEN_LEN);
        assert_ne!(a, b);
    }
}
