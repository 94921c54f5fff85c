//! Handover service — bounded calls into the handover sink.
//!
//! DESIGN
//! ======
//! Every sink call runs under `SINK_TIMEOUT_MS`. The two calls made on the
//! conversation path never fail outward: `estimated_wait_time` falls back
//! to the configured default and `save_conversation_context` reports
//! `false`. Agent-side operations return typed errors instead, since an
//! agent dashboard can show them.
//!
//! Context saves are at-most-once: no retry, no rollback.

use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};
use uuid::Uuid;

use crate::sink::{
    Availability, ChatMessage, ContactMethod, HandoverRecord, HandoverSink, HandoverStatus, NewHandover, SinkError,
};
use crate::state::AppState;

/// Current time as milliseconds since Unix epoch.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

fn sink(state: &AppState) -> Result<&Arc<dyn HandoverSink>, SinkError> {
    state.sink.as_ref().ok_or(SinkError::Unavailable)
}

async fn bounded<T>(state: &AppState, call: impl Future<Output = Result<T, SinkError>>) -> Result<T, SinkError> {
    let deadline = state.config.sink_timeout;
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(SinkError::Timeout(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX))),
    }
}

// =============================================================================
// CONVERSATION PATH (never fails)
// =============================================================================

/// Estimated agent wait in minutes, or the configured default when the
/// sink is absent, slow or failing, or records nothing above zero.
pub async fn estimated_wait_time(state: &AppState) -> u32 {
    let default = state.config.default_wait_minutes;
    let result = match sink(state) {
        Ok(sink) => bounded(state, sink.estimated_wait_time()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(Some(minutes)) if minutes > 0 => u32::try_from(minutes).unwrap_or(default),
        Ok(recorded) => {
            info!(default, ?recorded, "handover: no usable wait estimate, using default");
            default
        }
        Err(e) => {
            warn!(error = %e, default, "handover: wait time unavailable, using default");
            default
        }
    }
}

/// Park a conversation transcript for a human agent. Returns success.
pub async fn save_conversation_context(
    state: &AppState,
    conversation_id: &str,
    messages: Vec<ChatMessage>,
    user_id: &str,
) -> bool {
    let handover = NewHandover {
        conversation_id: conversation_id.to_owned(),
        user_id: user_id.to_owned(),
        messages,
        requested_at: now_ms(),
    };

    let result = match sink(state) {
        Ok(sink) => bounded(state, sink.save_handover(handover)).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => {
            info!(%id, %conversation_id, %user_id, "handover: conversation context saved");
            true
        }
        Err(e) => {
            warn!(error = %e, %conversation_id, "handover: saving conversation context failed");
            false
        }
    }
}

// =============================================================================
// AGENT OPERATIONS
// =============================================================================

/// # Errors
///
/// Returns the sink error, `Unavailable`, or `Timeout`.
pub async fn list_handovers(
    state: &AppState,
    status: Option<HandoverStatus>,
) -> Result<Vec<HandoverRecord>, SinkError> {
    bounded(state, sink(state)?.list_handovers(status)).await
}

/// Move a waiting handover to `connected` under `agent_id`.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, or the sink error.
pub async fn accept_handover(
    state: &AppState,
    id: Uuid,
    agent_id: &str,
    contact_method: ContactMethod,
) -> Result<HandoverRecord, SinkError> {
    let record = bounded(state, sink(state)?.accept_handover(id, agent_id, contact_method, now_ms())).await?;
    info!(%id, %agent_id, contact_method = contact_method.as_str(), room_id = %record.conversation_id, "handover: accepted");
    Ok(record)
}

/// # Errors
///
/// Returns `NotFound` for an unknown id, or the sink error.
pub async fn complete_handover(state: &AppState, id: Uuid, notes: Option<&str>) -> Result<HandoverRecord, SinkError> {
    let record = bounded(state, sink(state)?.complete_handover(id, notes, now_ms())).await?;
    info!(%id, "handover: completed");
    Ok(record)
}

/// # Errors
///
/// Returns the sink error, `Unavailable`, or `Timeout`.
pub async fn availability(state: &AppState) -> Result<Option<Availability>, SinkError> {
    bounded(state, sink(state)?.availability()).await
}

/// Replace the availability row, stamping `updated_at`.
///
/// # Errors
///
/// Returns `InvalidValue` for negative counts, or the sink error.
pub async fn update_availability(
    state: &AppState,
    available_agents: i32,
    busy_agents: i32,
    estimated_wait_time: i32,
) -> Result<Availability, SinkError> {
    if available_agents < 0 || busy_agents < 0 || estimated_wait_time < 0 {
        return Err(SinkError::InvalidValue("availability values must be non-negative".into()));
    }
    let availability = Availability { available_agents, busy_agents, estimated_wait_time, updated_at: now_ms() };
    bounded(state, sink(state)?.update_availability(availability)).await
}

#[cfg(test)]
#[path = "handover_test.rs"]
mod tests;
