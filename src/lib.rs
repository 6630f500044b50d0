//! Haven: anonymous group-support rooms.
//!
//! The [`identity`] module is the pure core. Everything else is the service
//! that hands those identities out.

pub mod config;
pub mod http;
pub mod identity;
pub mod notifications;
pub mod room;
pub mod telemetry;
pub mod util;
pub mod ws;

pub use identity::{derive_avatar_color, derive_display_name, derive_initials};
