pub mod routes;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};

use crate::notifications::NotificationFeed;
use crate::room::manager::RoomManager;
use crate::ws;

pub use routes::AppState;

impl AppState {
    pub fn new(rooms: RoomManager, feed: NotificationFeed) -> Self {
        Self { rooms: Arc::new(rooms), feed }
    }
}

async fn healthz() -> &'static str { "ok" }

/// All routes, without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/rooms", post(routes::create_room))
        .route("/rooms/:id/join", post(routes::join_room))
        .route("/rooms/:id/leave", post(routes::leave_room))
        .route("/rooms/:id/members", get(routes::list_members))
        .route("/identity", get(routes::identity))
        .route("/avatar", get(routes::avatar))
        .route("/api/notifications", get(routes::all_notifications))
        .route("/api/notifications/unread", get(routes::unread_notifications))
        .route("/ws", get(ws::connection::ws_handler))
        .with_state(state)
}
