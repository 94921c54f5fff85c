//! Signal — the envelopes exchanged over a signaling connection.
//!
//! ARCHITECTURE
//! ============
//! Every message on the socket is one JSON envelope
//! `{"event": "<name>", "data": <payload>}`. Clients send `ClientEvent`s,
//! the relay answers or forwards with `ServerEvent`s. The event names are
//! the ones browser clients already speak (`join-room`, `webrtc-offer`, ...).
//!
//! DESIGN
//! ======
//! - Session descriptions and ICE candidates are `serde_json::Value` and
//!   are never inspected. The relay only reads identifiers.
//! - `roomId` on the three forwarding events is accepted but unused;
//!   routing is by `toPeerId` alone.
//! - Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// TYPES
// =============================================================================

/// Opaque connection identifier assigned by the relay at connect time.
pub type PeerId = String;

/// Opaque room identifier chosen by the clients.
pub type RoomId = String;

/// Inbound events, client → relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Payload is the bare room id string.
    JoinRoom(RoomId),
    GetPeersInRoom {
        room_id: RoomId,
    },
    WebrtcOffer {
        #[serde(default)]
        room_id: RoomId,
        offer: Value,
        to_peer_id: PeerId,
    },
    WebrtcAnswer {
        #[serde(default)]
        room_id: RoomId,
        answer: Value,
        to_peer_id: PeerId,
    },
    WebrtcIceCandidate {
        #[serde(default)]
        room_id: RoomId,
        candidate: Value,
        to_peer_id: PeerId,
    },
}

/// Outbound events, relay → client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// First event on every connection; tells the client its own id.
    Connected { peer_id: PeerId },
    PeersInRoom { peers: Vec<PeerId> },
    PeerJoined { peer_id: PeerId },
    PeerLeft { peer_id: PeerId },
    WebrtcOffer { from_peer_id: PeerId, offer: Value },
    WebrtcAnswer { from_peer_id: PeerId, answer: Value },
    WebrtcIceCandidate { from_peer_id: PeerId, candidate: Value },
    /// Sent to the sender only. The connection stays open.
    Error { code: String, message: String, retryable: bool },
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join-room",
            Self::GetPeersInRoom { .. } => "get-peers-in-room",
            Self::WebrtcOffer { .. } => "webrtc-offer",
            Self::WebrtcAnswer { .. } => "webrtc-answer",
            Self::WebrtcIceCandidate { .. } => "webrtc-ice-candidate",
        }
    }
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::PeersInRoom { .. } => "peers-in-room",
            Self::PeerJoined { .. } => "peer-joined",
            Self::PeerLeft { .. } => "peer-left",
            Self::WebrtcOffer { .. } => "webrtc-offer",
            Self::WebrtcAnswer { .. } => "webrtc-answer",
            Self::WebrtcIceCandidate { .. } => "webrtc-ice-candidate",
            Self::Error { .. } => "error",
        }
    }

    /// Build a structured `error` event from a typed error.
    #[must_use]
    pub fn error_from(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self::Error { code: err.error_code().to_string(), message: err.to_string(), retryable: err.retryable() }
    }
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured error replies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ErrorCode for SignalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "E_MALFORMED_ENVELOPE",
        }
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Decode one inbound text message.
///
/// # Errors
///
/// Returns `SignalError::Malformed` if the text is not a known envelope.
pub fn decode(text: &str) -> Result<ClientEvent, SignalError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode one outbound event.
///
/// # Errors
///
/// Returns `SignalError::Malformed` if serialization fails.
pub fn encode(event: &ServerEvent) -> Result<String, SignalError> {
    Ok(serde_json::to_string(event)?)
}

// =============================================================================
// INITIATOR TIE-BREAK
// =============================================================================

/// Whether `own` should send the initiating offer to `peer`.
///
/// The lexicographically smaller id always yields, so exactly one side of
/// a pair initiates. Equal ids never initiate.
#[must_use]
pub fn should_initiate(own: &str, peer: &str) -> bool {
    own > peer
}

#[cfg(test)]
#[path = "signal_test.rs"]
mod tests;
