//! Postgres-backed handover sink.
//!
//! Tables are created by `src/db/migrations`. `agent_availability` holds a
//! single row pinned to `id = 1`.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::types::{
    Availability, ChatMessage, ContactMethod, HandoverRecord, HandoverSink, HandoverStatus, NewHandover, SinkError,
};

const HANDOVER_COLUMNS: &str = "id, conversation_id, user_id, conversation_history, status, requested_at, \
     connected_at, completed_at, agent_id, contact_method, notes";

type HandoverRow = (
    Uuid,
    String,
    String,
    serde_json::Value,
    String,
    i64,
    Option<i64>,
    Option<i64>,
    Option<String>,
    String,
    Option<String>,
);

type AvailabilityRow = (i32, i32, i32, i64);

pub struct PgHandoverSink {
    pool: PgPool,
}

impl PgHandoverSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_record(row: HandoverRow) -> Result<HandoverRecord, SinkError> {
    let (
        id,
        conversation_id,
        user_id,
        history,
        status,
        requested_at,
        connected_at,
        completed_at,
        agent_id,
        contact_method,
        notes,
    ) = row;

    let status =
        HandoverStatus::parse(&status).ok_or_else(|| SinkError::InvalidValue(format!("handover status '{status}'")))?;
    let contact_method = ContactMethod::parse(&contact_method)
        .ok_or_else(|| SinkError::InvalidValue(format!("contact method '{contact_method}'")))?;
    let conversation_history: Vec<ChatMessage> = serde_json::from_value(history)
        .map_err(|e| SinkError::InvalidValue(format!("conversation history: {e}")))?;

    Ok(HandoverRecord {
        id,
        conversation_id,
        user_id,
        conversation_history,
        status,
        requested_at,
        connected_at,
        completed_at,
        agent_id,
        contact_method,
        notes,
    })
}

fn row_to_availability((available_agents, busy_agents, estimated_wait_time, updated_at): AvailabilityRow) -> Availability {
    Availability { available_agents, busy_agents, estimated_wait_time, updated_at }
}

#[async_trait::async_trait]
impl HandoverSink for PgHandoverSink {
    async fn estimated_wait_time(&self) -> Result<Option<i64>, SinkError> {
        let minutes: Option<i32> =
            sqlx::query_scalar("SELECT estimated_wait_time FROM agent_availability WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(minutes.map(i64::from))
    }

    async fn save_handover(&self, handover: NewHandover) -> Result<Uuid, SinkError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO agent_handovers (id, conversation_id, user_id, conversation_history, status, requested_at)
             VALUES ($1, $2, $3, $4, 'waiting', $5)",
        )
        .bind(id)
        .bind(&handover.conversation_id)
        .bind(&handover.user_id)
        .bind(Json(&handover.messages))
        .bind(handover.requested_at)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_handovers(&self, status: Option<HandoverStatus>) -> Result<Vec<HandoverRecord>, SinkError> {
        let sql = format!(
            "SELECT {HANDOVER_COLUMNS}
             FROM agent_handovers
             WHERE $1::TEXT IS NULL OR status = $1
             ORDER BY requested_at DESC"
        );
        let rows = sqlx::query_as::<_, HandoverRow>(&sql)
            .bind(status.map(HandoverStatus::as_str))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn accept_handover(
        &self,
        id: Uuid,
        agent_id: &str,
        contact_method: ContactMethod,
        at: i64,
    ) -> Result<HandoverRecord, SinkError> {
        let sql = format!(
            "UPDATE agent_handovers
             SET status = 'connected', agent_id = $2, contact_method = $3, connected_at = $4
             WHERE id = $1
             RETURNING {HANDOVER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HandoverRow>(&sql)
            .bind(id)
            .bind(agent_id)
            .bind(contact_method.as_str())
            .bind(at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(SinkError::NotFound(id))?;

        row_to_record(row)
    }

    async fn complete_handover(&self, id: Uuid, notes: Option<&str>, at: i64) -> Result<HandoverRecord, SinkError> {
        let sql = format!(
            "UPDATE agent_handovers
             SET status = 'completed', notes = COALESCE($2, notes), completed_at = $3
             WHERE id = $1
             RETURNING {HANDOVER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HandoverRow>(&sql)
            .bind(id)
            .bind(notes)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(SinkError::NotFound(id))?;

        row_to_record(row)
    }

    async fn availability(&self) -> Result<Option<Availability>, SinkError> {
        let row = sqlx::query_as::<_, AvailabilityRow>(
            "SELECT available_agents, busy_agents, estimated_wait_time, updated_at
             FROM agent_availability
             WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_availability))
    }

    async fn update_availability(&self, availability: Availability) -> Result<Availability, SinkError> {
        let row = sqlx::query_as::<_, AvailabilityRow>(
            "INSERT INTO agent_availability (id, available_agents, busy_agents, estimated_wait_time, updated_at)
             VALUES (1, $1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET available_agents = EXCLUDED.available_agents,
                 busy_agents = EXCLUDED.busy_agents,
                 estimated_wait_time = EXCLUDED.estimated_wait_time,
                 updated_at = EXCLUDED.updated_at
             RETURNING available_agents, busy_agents, estimated_wait_time, updated_at",
        )
        .bind(availability.available_agents)
        .bind(availability.busy_agents)
        .bind(availability.estimated_wait_time)
        .bind(availability.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_availability(row))
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
