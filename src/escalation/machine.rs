//! Escalation state machine.
//!
//! DESIGN
//! ======
//! `EscalationState::update` runs once per completed turn and applies the
//! rules in priority order, first match wins:
//!
//! 1. explicit human request      -> `user_requested`
//! 2. complex-issue keyword       -> `complex_issue`
//! 3. refresh sentiment scores from this turn only, then
//!    - confusion > 0.7 bumps `failed_attempts`
//!    - frustration > 0.6         -> `detected_frustration`
//!    - `failed_attempts` >= 3    -> `multiple_failures`
//!    - assistant admitted it cannot help bumps `failed_attempts`
//!      (after the threshold check, so it can only trip a later turn)
//!
//! Escalation is one-way. An escalated state is returned unchanged by
//! `update`; only the caller can start over with `EscalationState::default()`.

use serde::{Deserialize, Serialize};

use super::scorer::{analyze_sentiment, detect_complex_issue, detect_human_request};

pub const CONFUSION_THRESHOLD: f64 = 0.7;
pub const FRUSTRATION_THRESHOLD: f64 = 0.6;
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// Phrases in an assistant reply that count as a failed attempt.
pub const ADMISSION_PHRASES: &[&str] =
    &["i can't help with that", "beyond my capabilities", "would you like to speak to a human agent"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    UserRequested,
    MultipleFailures,
    DetectedFrustration,
    ComplexIssue,
    AgentRequested,
}

impl EscalationReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserRequested => "user_requested",
            Self::MultipleFailures => "multiple_failures",
            Self::DetectedFrustration => "detected_frustration",
            Self::ComplexIssue => "complex_issue",
            Self::AgentRequested => "agent_requested",
        }
    }
}

impl std::fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-conversation escalation state. `reason` is `None` until escalation trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationState {
    pub should_escalate: bool,
    pub reason: Option<EscalationReason>,
    pub failed_attempts: u32,
    pub confusion_score: f64,
    pub frustration_score: f64,
}

impl EscalationState {
    /// Fold one completed turn into the state.
    #[must_use]
    pub fn update(self, user_message: &str, assistant_response: &str) -> Self {
        if self.should_escalate {
            return self;
        }

        if detect_human_request(user_message) {
            return self.escalate(EscalationReason::UserRequested);
        }

        if detect_complex_issue(user_message) {
            return self.escalate(EscalationReason::ComplexIssue);
        }

        let sentiment = analyze_sentiment(user_message);
        let mut next = Self { confusion_score: sentiment.confusion, frustration_score: sentiment.frustration, ..self };

        if sentiment.confusion > CONFUSION_THRESHOLD {
            next.failed_attempts += 1;
        }

        if sentiment.frustration > FRUSTRATION_THRESHOLD {
            return next.escalate(EscalationReason::DetectedFrustration);
        }

        if next.failed_attempts >= MAX_FAILED_ATTEMPTS {
            return next.escalate(EscalationReason::MultipleFailures);
        }

        if admits_failure(assistant_response) {
            next.failed_attempts += 1;
        }

        next
    }

    /// Trip escalation on behalf of a human agent. No-op once escalated.
    #[must_use]
    pub fn request_by_agent(self) -> Self {
        if self.should_escalate {
            return self;
        }
        self.escalate(EscalationReason::AgentRequested)
    }

    fn escalate(self, reason: EscalationReason) -> Self {
        Self { should_escalate: true, reason: Some(reason), ..self }
    }
}

fn admits_failure(assistant_response: &str) -> bool {
    let lower = assistant_response.to_lowercase();
    ADMISSION_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
