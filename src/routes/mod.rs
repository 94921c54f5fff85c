//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router carries the signaling socket, the escalation endpoints,
//! and the agent-facing handover API. Any origin may connect, matching how
//! browser clients reach the relay.

pub mod escalation;
pub mod handovers;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/socket", get(ws::handle_ws))
        .route("/api/escalation/evaluate", post(escalation::evaluate))
        .route("/api/escalation/analyze", post(escalation::analyze))
        .route("/api/escalation/agent-request", post(escalation::agent_request))
        .route("/api/handovers", get(handovers::list).post(handovers::save_context))
        .route("/api/handovers/wait-time", get(handovers::wait_time))
        .route("/api/handovers/{id}/accept", post(handovers::accept))
        .route("/api/handovers/{id}/complete", post(handovers::complete))
        .route(
            "/api/availability",
            get(handovers::get_availability).put(handovers::put_availability),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
