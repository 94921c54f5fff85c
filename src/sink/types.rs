//! Handover sink types — records, availability and the sink trait.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::signal::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// No sink is configured (no `DATABASE_URL`).
    #[error("handover sink unavailable")]
    Unavailable,

    #[error("handover sink timed out after {0}ms")]
    Timeout(u64),

    #[error("handover not found: {0}")]
    NotFound(Uuid),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for SinkError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable => "E_SINK_UNAVAILABLE",
            Self::Timeout(_) => "E_SINK_TIMEOUT",
            Self::NotFound(_) => "E_HANDOVER_NOT_FOUND",
            Self::InvalidValue(_) => "E_INVALID_VALUE",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Database(_))
    }
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One transcript entry, in conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

// =============================================================================
// HANDOVER RECORD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandoverStatus {
    Waiting,
    Connected,
    Completed,
}

impl HandoverStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Connected => "connected",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "waiting" => Some(Self::Waiting),
            "connected" => Some(Self::Connected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Video,
    Audio,
    Chat,
}

impl ContactMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Chat => "chat",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }
}

/// A conversation waiting for, or handled by, a human agent.
///
/// `conversation_id` doubles as the signaling room id for the call.
/// Timestamps are milliseconds since Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverRecord {
    pub id: Uuid,
    pub conversation_id: String,
    pub user_id: String,
    pub conversation_history: Vec<ChatMessage>,
    pub status: HandoverStatus,
    pub requested_at: i64,
    pub connected_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub agent_id: Option<String>,
    pub contact_method: ContactMethod,
    pub notes: Option<String>,
}

/// Insert payload for a fresh `waiting` handover.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHandover {
    pub conversation_id: String,
    pub user_id: String,
    pub messages: Vec<ChatMessage>,
    pub requested_at: i64,
}

// =============================================================================
// AVAILABILITY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available_agents: i32,
    pub busy_agents: i32,
    pub estimated_wait_time: i32,
    #[serde(default)]
    pub updated_at: i64,
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Durable store for handover context and agent availability.
#[async_trait::async_trait]
pub trait HandoverSink: Send + Sync {
    /// Estimated wait in minutes, `None` when no availability is recorded.
    async fn estimated_wait_time(&self) -> Result<Option<i64>, SinkError>;

    async fn save_handover(&self, handover: NewHandover) -> Result<Uuid, SinkError>;

    /// Handovers newest first, optionally filtered by status.
    async fn list_handovers(&self, status: Option<HandoverStatus>) -> Result<Vec<HandoverRecord>, SinkError>;

    async fn accept_handover(
        &self,
        id: Uuid,
        agent_id: &str,
        contact_method: ContactMethod,
        at: i64,
    ) -> Result<HandoverRecord, SinkError>;

    async fn complete_handover(&self, id: Uuid, notes: Option<&str>, at: i64) -> Result<HandoverRecord, SinkError>;

    async fn availability(&self) -> Result<Option<Availability>, SinkError>;

    async fn update_availability(&self, availability: Availability) -> Result<Availability, SinkError>;
}
