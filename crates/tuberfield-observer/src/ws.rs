//! `WebSocket` handler for real-time field update streaming.
//!
//! Clients connect to `GET /ws/ticks` and receive a JSON-encoded
//! [`TickBroadcast`] message after every tick, action, environmental
//! event, and reset. The first frame is the current snapshot, so a client
//! never has to wait a full day to draw the field. All connected clients
//! then see the same stream.
//!
//! If a client falls behind, lagged messages are skipped and the client
//! resumes from the most recent update.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, TickBroadcast, UpdateKind};

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming field updates.
///
/// # Route
///
/// `GET /ws/ticks`
pub async fn ws_ticks(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Encode an update as a text frame.
fn encode(update: &TickBroadcast) -> Option<Message> {
    serde_json::to_string(update)
        .map(|json| Message::Text(json.into()))
        .inspect_err(|e| warn!(error = %e, "Failed to serialize field update"))
        .ok()
}

/// Send one update. Returns `false` once the client is gone.
async fn send_update(socket: &mut WebSocket, update: &TickBroadcast) -> bool {
    let Some(frame) = encode(update) else {
        return true;
    };
    socket.send(frame).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before reading the snapshot so no update falls between.
    let mut rx = state.subscribe();
    let greeting = {
        let snap = state.snapshot.read().await;
        TickBroadcast::from_state(UpdateKind::Snapshot, &snap.state, snap.effects, Vec::new())
    };
    if !send_update(&mut socket, &greeting).await {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => match result {
                Ok(update) => {
                    if !send_update(&mut socket, &update).await {
                        debug!("WebSocket client disconnected (send failed)");
                        return;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!(skipped = n, "WebSocket client lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    debug!("Broadcast channel closed, shutting down WebSocket");
                    return;
                }
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket client disconnected");
                    return;
                }
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        return;
                    }
                }
                Some(Err(e)) => {
                    debug!(error = %e, "WebSocket error");
                    return;
                }
                // The stream is one-way; client text and binary frames are ignored.
                Some(Ok(_)) => {}
            },
        }
    }
}
