//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! The learner-facing event payload is [`FeedEvent`]: it carries no ground
//! truth fields at all, so suspicion flags and correct actions cannot leak
//! across this boundary.

use serde::{Deserialize, Serialize};

use crate::domain::{Evaluation, FeedEvent, ScenarioTemplate, SessionStarted, SessionSummary};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartSession {
        #[serde(rename = "templateId")]
        template_id: String,
    },
    PollEvents {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SubmitResponse {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "eventId")]
        event_id: String,
        suspicious: bool,
        action: String,
    },
    FinalizeSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    SessionStarted {
        session: SessionStarted,
    },
    Events {
        session_id: String,
        events: Vec<FeedEvent>,
        count: usize,
    },
    Evaluation {
        event_id: String,
        evaluation: Evaluation,
    },
    Summary {
        summary: SessionSummary,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(rename = "templateId")]
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondIn {
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub suspicious: bool,
    pub action: String,
}

#[derive(Serialize)]
pub struct EventsOut {
    pub session_id: String,
    pub events: Vec<FeedEvent>,
    pub count: usize,
}

/// Catalog listing entry: template metadata without event bodies (and without
/// ground truth).
#[derive(Serialize)]
pub struct ScenarioOut {
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub total_events: usize,
}

pub fn to_scenario_out(t: &ScenarioTemplate) -> ScenarioOut {
    ScenarioOut {
        template_id: t.template_id.clone(),
        name: t.name.clone(),
        description: t.description.clone(),
        difficulty: t.difficulty.clone(),
        total_events: t.events.len(),
    }
}

#[derive(Serialize)]
pub struct ScenariosOut {
    pub scenarios: Vec<ScenarioOut>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
