//! Handover routes — context save, wait estimate, and the agent queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::handover;
use crate::signal::ErrorCode;
use crate::sink::{Availability, ChatMessage, ContactMethod, HandoverRecord, HandoverStatus, SinkError};
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

pub struct ApiError(pub SinkError);

impl From<SinkError> for ApiError {
    fn from(err: SinkError) -> Self {
        Self(err)
    }
}

pub(crate) fn sink_error_to_status(err: &SinkError) -> StatusCode {
    match err {
        SinkError::NotFound(_) => StatusCode::NOT_FOUND,
        SinkError::InvalidValue(_) => StatusCode::BAD_REQUEST,
        SinkError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        SinkError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        SinkError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.0.error_code(),
            "message": self.0.to_string(),
            "retryable": self.0.retryable(),
        });
        (sink_error_to_status(&self.0), Json(body)).into_response()
    }
}

// =============================================================================
// BODIES
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveContextBody {
    pub conversation_id: String,
    pub user_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct SaveContextResponse {
    pub saved: bool,
}

#[derive(Serialize)]
pub struct WaitTimeResponse {
    pub minutes: u32,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBody {
    pub agent_id: String,
    #[serde(default = "default_contact_method")]
    pub contact_method: ContactMethod,
}

fn default_contact_method() -> ContactMethod {
    ContactMethod::Video
}

#[derive(Deserialize, Default)]
pub struct CompleteBody {
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBody {
    pub available_agents: i32,
    pub busy_agents: i32,
    pub estimated_wait_time: i32,
}

// =============================================================================
// CONVERSATION SIDE
// =============================================================================

/// `GET /api/handovers/wait-time`: always answers, falling back to the default.
pub async fn wait_time(State(state): State<AppState>) -> Json<WaitTimeResponse> {
    Json(WaitTimeResponse { minutes: handover::estimated_wait_time(&state).await })
}

/// `POST /api/handovers`: park the transcript for an agent.
pub async fn save_context(
    State(state): State<AppState>,
    Json(body): Json<SaveContextBody>,
) -> Json<SaveContextResponse> {
    let saved = handover::save_conversation_context(&state, &body.conversation_id, body.messages, &body.user_id).await;
    Json(SaveContextResponse { saved })
}

// =============================================================================
// AGENT SIDE
// =============================================================================

/// `GET /api/handovers?status=waiting`: queue, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HandoverRecord>>, ApiError> {
    let status = match query.status.as_deref() {
        None | Some("" | "all") => None,
        Some(raw) => Some(
            HandoverStatus::parse(raw).ok_or_else(|| SinkError::InvalidValue(format!("unknown status '{raw}'")))?,
        ),
    };
    Ok(Json(handover::list_handovers(&state, status).await?))
}

/// `POST /api/handovers/:id/accept`: agent takes the conversation.
pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AcceptBody>,
) -> Result<Json<HandoverRecord>, ApiError> {
    if body.agent_id.trim().is_empty() {
        return Err(SinkError::InvalidValue("agentId required".into()).into());
    }
    Ok(Json(handover::accept_handover(&state, id, &body.agent_id, body.contact_method).await?))
}

/// `POST /api/handovers/:id/complete`: agent closes the conversation.
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<CompleteBody>>,
) -> Result<Json<HandoverRecord>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    Ok(Json(handover::complete_handover(&state, id, body.notes.as_deref()).await?))
}

/// `GET /api/availability`
pub async fn get_availability(State(state): State<AppState>) -> Result<Response, ApiError> {
    match handover::availability(&state).await? {
        Some(availability) => Ok(Json(availability).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `PUT /api/availability`
pub async fn put_availability(
    State(state): State<AppState>,
    Json(body): Json<AvailabilityBody>,
) -> Result<Json<Availability>, ApiError> {
    let updated =
        handover::update_availability(&state, body.available_agents, body.busy_agents, body.estimated_wait_time)
            .await?;
    Ok(Json(updated))
}

#[cfg(test)]
#[path = "handovers_test.rs"]
mod tests;
