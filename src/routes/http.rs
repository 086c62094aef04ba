//! HTTP endpoint handlers. These are thin wrappers that forward to the engine.
//! Each handler is instrumented; engine errors carry their own HTTP mapping.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{info, instrument};

use crate::error::EngineError;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_scenarios(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let scenarios: Vec<_> = state.catalog.list().into_iter().map(to_scenario_out).collect();
  let count = scenarios.len();
  Json(ScenariosOut { scenarios, count })
}

#[instrument(level = "info", skip(state, body), fields(template = %body.template_id))]
pub async fn http_start_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<impl IntoResponse, EngineError> {
  let started = state.engine.start(&body.template_id).await?;
  info!(target: "scenario", session = %started.session_id, "HTTP session started");
  Ok(Json(started))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn http_poll_events(
  State(state): State<Arc<AppState>>,
  Path(session_id): Path<String>,
) -> Result<impl IntoResponse, EngineError> {
  let events = state.engine.poll(&session_id).await?;
  let count = events.len();
  Ok(Json(EventsOut { session_id, events, count }))
}

#[instrument(level = "info", skip(state, body), fields(%session_id, event = %body.event_id))]
pub async fn http_submit_response(
  State(state): State<Arc<AppState>>,
  Path(session_id): Path<String>,
  Json(body): Json<RespondIn>,
) -> Result<impl IntoResponse, EngineError> {
  let evaluation = state
    .engine
    .respond(&session_id, &body.event_id, body.suspicious, &body.action)
    .await?;
  info!(target: "scenario", session = %session_id, event = %body.event_id,
    score = evaluation.score, "HTTP response evaluated");
  Ok(Json(evaluation))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn http_finalize_session(
  State(state): State<Arc<AppState>>,
  Path(session_id): Path<String>,
) -> Result<impl IntoResponse, EngineError> {
  let summary = state.engine.finalize(&session_id).await?;
  info!(target: "scenario", session = %session_id, grade = %summary.grade, "HTTP session finalized");
  Ok(Json(summary))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn http_session_summary(
  State(state): State<Arc<AppState>>,
  Path(session_id): Path<String>,
) -> Result<impl IntoResponse, EngineError> {
  let summary = state.engine.summary(&session_id).await?;
  Ok(Json(summary))
}
