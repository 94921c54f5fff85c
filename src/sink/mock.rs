//! In-memory sink used by tests.

use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use super::types::{
    Availability, ContactMethod, HandoverRecord, HandoverSink, HandoverStatus, NewHandover, SinkError,
};

#[derive(Default)]
pub struct MockSink {
    pub handovers: Mutex<Vec<HandoverRecord>>,
    pub availability: Mutex<Option<Availability>>,
    /// Every call sleeps this long before answering.
    pub delay: Option<Duration>,
    /// Every call fails with a database error.
    pub failing: bool,
}

impl MockSink {
    #[must_use]
    pub fn with_wait_time(minutes: i32) -> Self {
        let availability = Availability { available_agents: 1, busy_agents: 0, estimated_wait_time: minutes, updated_at: 0 };
        Self { availability: Mutex::new(Some(availability)), ..Self::default() }
    }

    #[must_use]
    pub fn slow(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::with_wait_time(1) }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    async fn gate(&self) -> Result<(), SinkError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(SinkError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut HandoverRecord)) -> Result<HandoverRecord, SinkError> {
        let mut handovers = self.handovers.lock().expect("mock mutex should lock");
        let record = handovers
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(SinkError::NotFound(id))?;
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait::async_trait]
impl HandoverSink for MockSink {
    async fn estimated_wait_time(&self) -> Result<Option<i64>, SinkError> {
        self.gate().await?;
        let availability = self.availability.lock().expect("mock mutex should lock");
        Ok(availability.map(|a| i64::from(a.estimated_wait_time)))
    }

    async fn save_handover(&self, handover: NewHandover) -> Result<Uuid, SinkError> {
        self.gate().await?;
        let id = Uuid::new_v4();
        self.handovers
            .lock()
            .expect("mock mutex should lock")
            .push(HandoverRecord {
                id,
                conversation_id: handover.conversation_id,
                user_id: handover.user_id,
                conversation_history: handover.messages,
                status: HandoverStatus::Waiting,
                requested_at: handover.requested_at,
                connected_at: None,
                completed_at: None,
                agent_id: None,
                contact_method: ContactMethod::Video,
                notes: None,
            });
        Ok(id)
    }

    async fn list_handovers(&self, status: Option<HandoverStatus>) -> Result<Vec<HandoverRecord>, SinkError> {
        self.gate().await?;
        let handovers = self.handovers.lock().expect("mock mutex should lock");
        let mut out: Vec<HandoverRecord> = handovers
            .iter()
            .filter(|h| status.is_none_or(|s| h.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(out)
    }

    async fn accept_handover(
        &self,
        id: Uuid,
        agent_id: &str,
        contact_method: ContactMethod,
        at: i64,
    ) -> Result<HandoverRecord, SinkError> {
        self.gate().await?;
        self.update(id, |h| {
            h.status = HandoverStatus::Connected;
            h.agent_id = Some(agent_id.to_owned());
            h.contact_method = contact_method;
            h.connected_at = Some(at);
        })
    }

    async fn complete_handover(&self, id: Uuid, notes: Option<&str>, at: i64) -> Result<HandoverRecord, SinkError> {
        self.gate().await?;
        self.update(id, |h| {
            h.status = HandoverStatus::Completed;
            if let Some(notes) = notes {
                h.notes = Some(notes.to_owned());
            }
            h.completed_at = Some(at);
        })
    }

    async fn availability(&self) -> Result<Option<Availability>, SinkError> {
        self.gate().await?;
        Ok(*self.availability.lock().expect("mock mutex should lock"))
    }

    async fn update_availability(&self, availability: Availability) -> Result<Availability, SinkError> {
        self.gate().await?;
        *self.availability.lock().expect("mock mutex should lock") = Some(availability);
        Ok(availability)
    }
}
