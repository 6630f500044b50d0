use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, Method};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use haven::config;
use haven::http::{self, AppState};
use haven::notifications::NotificationFeed;
use haven::room::manager::RoomManager;
use haven::telemetry;

const PRUNE_EVERY: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let feed = NotificationFeed::new(config::notifications_file());
    let state = AppState::new(RoomManager::new(config::room_capacity()), feed);

    let rooms = state.rooms.clone();
    let max_age = config::room_max_age();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PRUNE_EVERY);
        loop {
            tick.tick().await;
            rooms.prune_old(max_age);
        }
    });

    let app = http::router(state)
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
