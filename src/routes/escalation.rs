//! Escalation routes — turn evaluation for chat front ends.
//!
//! The engine is pure; these handlers only move `EscalationState` in and
//! out as JSON. The caller keeps the state between turns.

use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::escalation::{EscalationState, analyze_sentiment, detect_complex_issue, detect_human_request};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateBody {
    /// Missing state means a fresh conversation.
    #[serde(default)]
    pub state: EscalationState,
    pub user_message: String,
    #[serde(default)]
    pub assistant_response: String,
}

#[derive(Deserialize)]
pub struct AnalyzeBody {
    pub text: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub human_request: bool,
    pub complex_issue: bool,
    pub confusion: f64,
    pub frustration: f64,
}

#[derive(Deserialize)]
pub struct AgentRequestBody {
    #[serde(default)]
    pub state: EscalationState,
}

/// `POST /api/escalation/evaluate`: fold one completed turn into the state.
pub async fn evaluate(Json(body): Json<EvaluateBody>) -> Json<EscalationState> {
    let next = body
        .state
        .update(&body.user_message, &body.assistant_response);
    if next.should_escalate && !body.state.should_escalate {
        let reason = next.reason.map_or("-", |r| r.as_str());
        info!(reason, failed_attempts = next.failed_attempts, "escalation: tripped");
    }
    Json(next)
}

/// `POST /api/escalation/analyze`: classifier output for one utterance.
pub async fn analyze(Json(body): Json<AnalyzeBody>) -> Json<AnalyzeResponse> {
    let sentiment = analyze_sentiment(&body.text);
    Json(AnalyzeResponse {
        human_request: detect_human_request(&body.text),
        complex_issue: detect_complex_issue(&body.text),
        confusion: sentiment.confusion,
        frustration: sentiment.frustration,
    })
}

/// `POST /api/escalation/agent-request`: an agent pulls the conversation.
pub async fn agent_request(Json(body): Json<AgentRequestBody>) -> Json<EscalationState> {
    let next = body.state.request_by_agent();
    if !body.state.should_escalate {
        info!("escalation: tripped by agent");
    }
    Json(next)
}

#[cfg(test)]
#[path = "escalation_test.rs"]
mod tests;
