//! Room chat over WebSocket. Lines are attributed to the sender's anonymous identity.

use axum::{extract::{Query, State}, response::{IntoResponse, Response}};
use axum::http::StatusCode;
use axum::extract::ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade, WebSocket, Message};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::http::routes::AppState;
use crate::identity::AnonymousIdentity;
use crate::room::manager::{ChatLine, RoomManager};

const MAX_LINE_CHARS: usize = 2000;

#[derive(Deserialize)]
pub struct WsParams {
    pub room_id: String,
    pub user_id: String,
}

// Membership is checked before the upgrade headers so outsiders always get 401.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(WsParams { room_id, user_id }): Query<WsParams>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Some(identity) = state.rooms.member(&room_id, &user_id) else {
        return (StatusCode::UNAUTHORIZED, "not a member of this room").into_response();
    };
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, user_id, identity))
}

async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    room_id: String,
    user_id: String,
    identity: AnonymousIdentity,
) {
    let lines = match state.rooms.subscribe(&room_id) {
        Ok(rx) => rx,
        Err(err) => {
            tracing::debug!(%room_id, error = %err, "room vanished before socket opened");
            return;
        }
    };
    let (ws_tx, ws_rx) = socket.split();
    let mut forward = tokio::spawn(forward_lines(lines, ws_tx));

    tracing::debug!(%room_id, member = %identity.display_name, "chat opened");
    tokio::select! {
        _ = relay_frames(ws_rx, &state.rooms, &room_id, &user_id, &identity) => {}
        _ = &mut forward => {}
    }
    forward.abort();
    tracing::debug!(%room_id, member = %identity.display_name, "chat closed");
}

/// Pushes room lines to the client as JSON text frames until the room goes
/// away or the client stops accepting frames.
pub(crate) async fn forward_lines<S>(mut lines: broadcast::Receiver<ChatLine>, mut sink: S)
where
    S: Sink<Message> + Unpin,
{
    loop {
        let line = match lines.recv().await {
            Ok(line) => line,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "chat receiver lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let text = match serde_json::to_string(&line) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode chat line");
                continue;
            }
        };
        if sink.send(Message::Text(text)).await.is_err() {
            break;
        }
    }
}

/// Publishes the client's text frames as the member's identity. Returns on a
/// close frame, a read error, or once the member is no longer in the room.
pub(crate) async fn relay_frames<S, E>(
    mut frames: S,
    rooms: &RoomManager,
    room_id: &str,
    user_id: &str,
    identity: &AnonymousIdentity,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
{
    while let Some(Ok(msg)) = frames.next().await {
        match msg {
            Message::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let text: String = text.chars().take(MAX_LINE_CHARS).collect();
                if let Err(err) = rooms.publish(room_id, user_id, ChatLine::new(identity, text)) {
                    tracing::debug!(%room_id, error = %err, "dropping chat session");
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use futures::{channel::mpsc, stream};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::http::router;
    use crate::notifications::NotificationFeed;

    fn text(s: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(s.to_owned()))
    }

    fn decode(frame: &Message) -> Value {
        match frame {
            Message::Text(t) => serde_json::from_str(t).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn outsiders_are_rejected_before_upgrade() {
        let state = AppState::new(RoomManager::new(4), NotificationFeed::default());
        let created = state.rooms.create_room(None);
        state.rooms.join_room(&created.id, &created.invite_token, "u1").unwrap();
        let app = router(state);

        let get = |uri: String| Request::builder().uri(uri).body(Body::empty()).unwrap();

        let resp = app.clone().oneshot(get(format!("/ws?room_id={}&user_id=u2", created.id))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = app.clone().oneshot(get("/ws?room_id=missing&user_id=u1".into())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // a member gets past the gate; the plain request then fails the upgrade itself
        let resp = app.oneshot(get(format!("/ws?room_id={}&user_id=u1", created.id))).await.unwrap();
        assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn frames_are_attributed_and_close_ends_the_session() {
        let rooms = RoomManager::new(4);
        let created = rooms.create_room(None);
        let me = rooms.join_room(&created.id, &created.invite_token, "u1").unwrap();
        let mut rx = rooms.subscribe(&created.id).unwrap();

        let frames = stream::iter(vec![
            text("  hello there  "),
            text("   "),
            Ok(Message::Close(None)),
            text("after close"),
        ]);
        relay_frames(frames, &rooms, &created.id, "u1", &me).await;

        let line = rx.recv().await.unwrap();
        assert_eq!(line, ChatLine::new(&me, "hello there".into()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn session_ends_once_member_leaves() {
        let rooms = RoomManager::new(4);
        let created = rooms.create_room(None);
        let me = rooms.join_room(&created.id, &created.invite_token, "u1").unwrap();
        let mut rx = rooms.subscribe(&created.id).unwrap();
        rooms.leave_room(&created.id, "u1").unwrap();

        relay_frames(stream::iter(vec![text("still here"), text("again")]), &rooms, &created.id, "u1", &me).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn forwarded_lines_are_json_and_lag_is_skipped() {
        let me = AnonymousIdentity::derive("u1", "room");
        let (tx, rx) = broadcast::channel(2);
        for i in 0..5 {
            tx.send(ChatLine::new(&me, format!("line {i}"))).unwrap();
        }
        drop(tx);

        let (sink, out) = mpsc::unbounded::<Message>();
        forward_lines(rx, sink).await;

        let frames: Vec<Message> = out.collect().await;
        let texts: Vec<Value> = frames.iter().map(|f| decode(f)["text"].clone()).collect();
        assert_eq!(texts, ["line 3", "line 4"]);

        let first = decode(&frames[0]);
        assert_eq!(first["from"], me.display_name.as_str());
        assert_eq!(first["initials"], me.initials.as_str());
        assert_eq!(first["color"], me.color);
    }

    #[tokio::test]
    async fn forwarding_stops_when_client_is_gone() {
        let me = AnonymousIdentity::derive("u1", "room");
        let (tx, rx) = broadcast::channel(4);
        tx.send(ChatLine::new(&me, "anyone?".into())).unwrap();

        let (sink, out) = mpsc::unbounded::<Message>();
        drop(out);
        // returns even though the room channel is still open
        forward_lines(rx, sink).await;
        drop(tx);
    }
}
