//! Escalation — deciding when the assistant hands a conversation to a human.
//!
//! DESIGN
//! ======
//! `scorer` holds pure keyword classifiers over one utterance. `machine`
//! folds those classifications into a per-conversation `EscalationState`,
//! one call per completed turn. Nothing here does I/O; the handover sink
//! lives in `crate::sink` and is reached through `crate::services::handover`.
//!
//! The state is a value owned by the caller. There are no process-wide
//! counters, so concurrent conversations never interfere.

pub mod machine;
pub mod scorer;

pub use machine::{EscalationReason, EscalationState};
pub use scorer::{Sentiment, analyze_sentiment, detect_complex_issue, detect_human_request};
