//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the room registry, the outbound queue of every live signaling
//! connection, and the optional handover sink. The registry sits behind a
//! single `RwLock`, so membership changes are serialized even on the
//! multi-threaded runtime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use crate::config::RelayConfig;
use crate::registry::RoomRegistry;
use crate::signal::{PeerId, ServerEvent};
use crate::sink::HandoverSink;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub rooms: Arc<RwLock<RoomRegistry>>,
    /// Live connections: `peer_id` -> sender for outgoing events.
    pub peers: Arc<RwLock<HashMap<PeerId, mpsc::Sender<ServerEvent>>>>,
    /// Optional handover sink. `None` if `DATABASE_URL` is not configured.
    pub sink: Option<Arc<dyn HandoverSink>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig, sink: Option<Arc<dyn HandoverSink>>) -> Self {
        let rooms = RoomRegistry::with_capacity(config.room_capacity);
        Self {
            config: Arc::new(config),
            rooms: Arc::new(RwLock::new(rooms)),
            peers: Arc::new(RwLock::new(HashMap::new())),
            sink,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
