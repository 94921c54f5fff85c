//! Handover context sink — where escalated conversations are parked for agents.
//!
//! DESIGN
//! ======
//! The escalation engine never talks to storage directly. It goes through
//! `crate::services::handover`, which applies a deadline and a safe default
//! to every call on a `HandoverSink`. `PgHandoverSink` is the only production
//! implementation; tests substitute in-memory mocks.

#[cfg(test)]
pub mod mock;
pub mod postgres;
pub mod types;

pub use postgres::PgHandoverSink;
pub use types::{
    Availability, ChatMessage, ContactMethod, HandoverRecord, HandoverSink, HandoverStatus, NewHandover, Role,
    SinkError,
};
