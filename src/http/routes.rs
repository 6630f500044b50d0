//! HTTP routes: rooms, identity previews, notification feeds.

use std::sync::Arc;

use axum::{extract::{Path, Query, State}, response::{IntoResponse, Response}, Json};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::identity::{AnonymousIdentity, AvatarPresentation};
use crate::notifications::{Notification, NotificationFeed};
use crate::room::manager::{RoomError, RoomManager};

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomManager>,
    pub feed: NotificationFeed,
}

impl IntoResponse for RoomError {
    fn into_response(self) -> Response {
        let status = match self {
            RoomError::NotFound => StatusCode::NOT_FOUND,
            RoomError::InvalidToken => StatusCode::UNAUTHORIZED,
            RoomError::Full => StatusCode::CONFLICT,
            RoomError::NotMember => StatusCode::FORBIDDEN,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(CreateRoomRequest { topic }): Json<CreateRoomRequest>,
) -> impl IntoResponse {
    let topic = topic.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty());
    (StatusCode::CREATED, Json(state.rooms.create_room(topic)))
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub token: String,
    pub user_id: String,
}

pub async fn join_room(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(JoinRequest { token, user_id }): Json<JoinRequest>,
) -> Response {
    if user_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "user_id is required").into_response();
    }
    match state.rooms.join_room(&id, &token, &user_id) {
        Ok(identity) => Json(identity).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Deserialize)]
pub struct LeaveRequest {
    pub user_id: String,
}

pub async fn leave_room(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(LeaveRequest { user_id }): Json<LeaveRequest>,
) -> Result<StatusCode, RoomError> {
    state.rooms.leave_room(&id, &user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnonymousIdentity>>, RoomError> {
    state.rooms.members(&id).map(Json)
}

#[derive(Deserialize)]
pub struct IdentityQuery {
    pub user_id: String,
    pub room_id: String,
}

/// Preview the identity a user would get in a room. Does not touch the registry.
pub async fn identity(Query(IdentityQuery { user_id, room_id }): Query<IdentityQuery>) -> Json<AnonymousIdentity> {
    Json(AnonymousIdentity::derive(&user_id, &room_id))
}

#[derive(Deserialize)]
pub struct AvatarQuery {
    pub name: String,
}

pub async fn avatar(Query(AvatarQuery { name }): Query<AvatarQuery>) -> Json<AvatarPresentation> {
    Json(AvatarPresentation::for_name(&name))
}

// Both feeds answer 200 with a JSON array, empty when anything fails.
pub async fn all_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.feed.all().await)
}

pub async fn unread_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.feed.unread().await)
}
