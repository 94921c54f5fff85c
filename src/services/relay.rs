//! Relay service — room membership and point-to-point forwarding.
//!
//! DESIGN
//! ======
//! The relay only reads identifiers. Offers, answers and ICE candidates are
//! moved from the inbound envelope into the outbound one untouched, with the
//! sender's connection id stamped as `fromPeerId`.
//!
//! Delivery is a non-blocking `try_send` onto the target connection's
//! queue. A target that is gone (or whose queue is full) drops the event
//! silently; the sender learns about departures from `peer-left`.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::registry::{Departure, Joined, RegistryError};
use crate::signal::{ClientEvent, PeerId, ServerEvent, should_initiate};
use crate::state::AppState;

// =============================================================================
// CONNECTIONS
// =============================================================================

/// Make `peer_id` addressable by forwards and broadcasts.
pub async fn register(state: &AppState, peer_id: &str, tx: mpsc::Sender<ServerEvent>) {
    state.peers.write().await.insert(peer_id.to_owned(), tx);
}

/// Drop a connection: forget its queue, leave every room, and tell the
/// remaining members of each room with one `peer-left`.
pub async fn disconnect(state: &AppState, peer_id: &str) -> Vec<Departure> {
    state.peers.write().await.remove(peer_id);

    let (departures, open_rooms) = {
        let mut rooms = state.rooms.write().await;
        let departures = rooms.leave(peer_id);
        (departures, rooms.room_count())
    };
    debug!(%peer_id, open_rooms, "relay: registry after leave");
    for departure in &departures {
        info!(%peer_id, room_id = %departure.room_id, remaining = departure.remaining.len(), "relay: peer left room");
        let event = ServerEvent::PeerLeft { peer_id: peer_id.to_owned() };
        broadcast(state, &departure.remaining, &event).await;
    }
    departures
}

// =============================================================================
// ROOMS
// =============================================================================

/// Join `room_id` and announce the joiner to every member already present.
///
/// # Errors
///
/// Returns `RegistryError::RoomFull` when a room capacity is configured and
/// reached. Nobody is notified in that case.
pub async fn join_room(state: &AppState, room_id: &str, peer_id: &str) -> Result<Joined, RegistryError> {
    let joined = state.rooms.write().await.join(room_id, peer_id)?;

    info!(%peer_id, %room_id, others = joined.others.len(), rejoined = joined.rejoined, "relay: peer joined room");
    for other in &joined.others {
        let initiator = if should_initiate(peer_id, other) { peer_id } else { other.as_str() };
        debug!(%room_id, a = %peer_id, b = %other, %initiator, "relay: expected offer initiator");
    }

    let event = ServerEvent::PeerJoined { peer_id: peer_id.to_owned() };
    broadcast(state, &joined.others, &event).await;
    Ok(joined)
}

/// Current members of `room_id`, the asking peer included.
pub async fn peers_in_room(state: &AppState, room_id: &str) -> Vec<PeerId> {
    state.rooms.read().await.list_peers(room_id)
}

// =============================================================================
// FORWARDING
// =============================================================================

/// Turn an inbound offer/answer/candidate into its outbound form and target.
/// Returns `None` for events that are not forwarded.
#[must_use]
pub fn forward_envelope(from: &str, event: ClientEvent) -> Option<(PeerId, ServerEvent)> {
    let from_peer_id = from.to_owned();
    match event {
        ClientEvent::WebrtcOffer { offer, to_peer_id, .. } => {
            Some((to_peer_id, ServerEvent::WebrtcOffer { from_peer_id, offer }))
        }
        ClientEvent::WebrtcAnswer { answer, to_peer_id, .. } => {
            Some((to_peer_id, ServerEvent::WebrtcAnswer { from_peer_id, answer }))
        }
        ClientEvent::WebrtcIceCandidate { candidate, to_peer_id, .. } => {
            Some((to_peer_id, ServerEvent::WebrtcIceCandidate { from_peer_id, candidate }))
        }
        ClientEvent::JoinRoom(_) | ClientEvent::GetPeersInRoom { .. } => None,
    }
}

/// Forward a signaling event from `from` to the peer it names.
/// Returns whether the event was queued for delivery.
pub async fn forward(state: &AppState, from: &str, event: ClientEvent) -> bool {
    let name = event.name();
    let Some((to, outbound)) = forward_envelope(from, event) else {
        return false;
    };
    let delivered = send_to(state, &to, outbound).await;
    debug!(%from, %to, event = name, delivered, "relay: forward");
    delivered
}

/// Queue one event for a single connection. Unknown targets are a silent miss.
pub async fn send_to(state: &AppState, peer_id: &str, event: ServerEvent) -> bool {
    let peers = state.peers.read().await;
    let Some(tx) = peers.get(peer_id) else {
        debug!(%peer_id, event = event.name(), "relay: routing miss, dropped");
        return false;
    };
    try_deliver(peer_id, tx, event)
}

/// Queue one event for each listed connection.
pub async fn broadcast(state: &AppState, targets: &[PeerId], event: &ServerEvent) {
    if targets.is_empty() {
        return;
    }
    let peers = state.peers.read().await;
    for peer_id in targets {
        if let Some(tx) = peers.get(peer_id) {
            try_deliver(peer_id, tx, event.clone());
        }
    }
}

fn try_deliver(peer_id: &str, tx: &mpsc::Sender<ServerEvent>, event: ServerEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(event)) => {
            warn!(%peer_id, event = event.name(), "relay: peer queue full; dropping event");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
