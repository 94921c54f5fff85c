//! WebSocket handler — one signaling connection per participant.
//!
//! DESIGN
//! ======
//! On upgrade, assigns a connection id and enters a `select!` loop:
//! - Incoming client envelopes → decode + dispatch by event
//! - Events queued by other connections (joins, leaves, forwards) → client
//!
//! Dispatch returns the events meant for the sender; everything addressed
//! to other peers goes through `services::relay`, which never blocks.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register queue → send `connected` with `peerId`
//! 2. Client sends envelopes → dispatch → replies to sender, forwards to peers
//! 3. Close or transport error → leave every room → `peer-left` to the rest

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::relay;
use crate::signal::{self, ClientEvent, ServerEvent};
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let peer_id = Uuid::new_v4().to_string();

    // Per-connection queue for events produced by other connections.
    let (peer_tx, mut peer_rx) = mpsc::channel::<ServerEvent>(state.config.peer_queue_capacity);
    relay::register(&state, &peer_id, peer_tx).await;

    let welcome = ServerEvent::Connected { peer_id: peer_id.clone() };
    if send_event(&mut socket, &welcome).await.is_ok() {
        info!(%peer_id, "ws: peer connected");

        loop {
            tokio::select! {
                msg = socket.recv() => {
                    let Some(Ok(msg)) = msg else { break };
                    match msg {
                        Message::Text(text) => {
                            let replies = process_inbound_text(&state, &peer_id, text.as_str()).await;
                            if send_all(&mut socket, &replies).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
                Some(event) = peer_rx.recv() => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    let departures = relay::disconnect(&state, &peer_id).await;
    info!(%peer_id, rooms = departures.len(), "ws: peer disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Decode and handle one inbound text message, returning events for the sender.
///
/// Kept apart from the socket so tests can drive dispatch directly.
async fn process_inbound_text(state: &AppState, peer_id: &str, text: &str) -> Vec<ServerEvent> {
    let event = match signal::decode(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%peer_id, error = %e, "ws: invalid inbound envelope");
            return vec![ServerEvent::error_from(&e)];
        }
    };

    if matches!(event, ClientEvent::WebrtcIceCandidate { .. }) {
        debug!(%peer_id, event = event.name(), "ws: recv");
    } else {
        info!(%peer_id, event = event.name(), "ws: recv");
    }

    match event {
        ClientEvent::JoinRoom(room_id) => match relay::join_room(state, &room_id, peer_id).await {
            Ok(_) => vec![],
            Err(e) => {
                warn!(%peer_id, %room_id, error = %e, "ws: join refused");
                vec![ServerEvent::error_from(&e)]
            }
        },
        ClientEvent::GetPeersInRoom { room_id } => {
            let peers = relay::peers_in_room(state, &room_id).await;
            vec![ServerEvent::PeersInRoom { peers }]
        }
        forwardable => {
            relay::forward(state, peer_id, forwardable).await;
            vec![]
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let json = match signal::encode(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    if let ServerEvent::Error { code, message, .. } = event {
        warn!(event = event.name(), %code, %message, "ws: send error");
    } else {
        debug!(event = event.name(), "ws: send");
    }
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

async fn send_all(socket: &mut WebSocket, events: &[ServerEvent]) -> Result<(), ()> {
    for event in events {
        send_event(socket, event).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
