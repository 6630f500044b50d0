//! Configuration from environment variables (port, room limits, feed source).

use std::{env, net::{Ipv4Addr, SocketAddr}};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ROOM_CAPACITY: usize = 12;
const DEFAULT_ROOM_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = parse_or(env::var("PORT").ok().as_deref(), DEFAULT_PORT);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Maximum members per room (`HAVEN_ROOM_CAPACITY`, default 12, never below 1).
pub fn room_capacity() -> usize {
    capacity_from(env::var("HAVEN_ROOM_CAPACITY").ok().as_deref())
}

/// Rooms older than this are pruned (`HAVEN_ROOM_MAX_AGE_SECS`, default one day).
pub fn room_max_age() -> Duration {
    let secs = parse_or(env::var("HAVEN_ROOM_MAX_AGE_SECS").ok().as_deref(), DEFAULT_ROOM_MAX_AGE_SECS);
    Duration::from_secs(secs)
}

/// JSON file backing the notification feed, if any (`HAVEN_NOTIFICATIONS_FILE`).
pub fn notifications_file() -> Option<PathBuf> {
    env::var_os("HAVEN_NOTIFICATIONS_FILE")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn capacity_from(raw: Option<&str>) -> usize {
    parse_or(raw, DEFAULT_ROOM_CAPACITY).max(1)
}

/// Parses a trimmed raw value, falling back to `default` when unset or malformed.
fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
