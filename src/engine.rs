//! Session store and lifecycle controller: start, poll, respond, finalize.
//!
//! The engine owns all sessions. Each session lives behind its own
//! `tokio::sync::Mutex`, so operations on one session are serialized (a race
//! of two responses to the same event yields exactly one success) while
//! different sessions proceed in parallel. The registry map is only locked
//! long enough to look a handle up.
//!
//! The engine is an explicit object rather than module state so several
//! engines (with different clocks/seeds) can coexist in one process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::domain::{
  Action, Evaluation, FeedEvent, ResponseRecord, Session, SessionStarted, SessionStatus,
  SessionSummary,
};
use crate::error::EngineError;
use crate::{pacer, summary};

pub struct ScenarioEngine {
  catalog: Arc<Catalog>,
  clock: Arc<dyn Clock>,
  rng: StdMutex<StdRng>,
  sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl ScenarioEngine {
  pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Self {
    Self::with_rng(catalog, clock, StdRng::from_entropy())
  }

  /// Fixed seed: with a fixed clock this makes reveal schedules reproducible.
  pub fn with_seed(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, seed: u64) -> Self {
    Self::with_rng(catalog, clock, StdRng::seed_from_u64(seed))
  }

  fn with_rng(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, rng: StdRng) -> Self {
    Self {
      catalog,
      clock,
      rng: StdMutex::new(rng),
      sessions: RwLock::new(HashMap::new()),
    }
  }

  async fn session_handle(&self, session_id: &str) -> Result<Arc<Mutex<Session>>, EngineError> {
    self
      .sessions
      .read()
      .await
      .get(session_id)
      .cloned()
      .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))
  }

  /// Start a new RUNNING session for a template. The whole reveal schedule is
  /// drawn here, once, so later polls can never re-roll it.
  #[instrument(level = "info", skip(self))]
  pub async fn start(&self, template_id: &str) -> Result<SessionStarted, EngineError> {
    let template = self.catalog.get(template_id)?.clone();

    let schedule = {
      let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
      pacer::draw_schedule(&mut *rng, &template.events)
    };

    let session = Session {
      session_id: Uuid::new_v4().to_string(),
      template_id: template.template_id.clone(),
      started_at: self.clock.now(),
      status: SessionStatus::Running,
      schedule,
      released: Vec::new(),
      responses: HashMap::new(),
    };

    let started = SessionStarted {
      session_id: session.session_id.clone(),
      template_id: session.template_id.clone(),
      scenario_name: template.name.clone(),
      total_events: template.events.len(),
      status: session.status,
    };

    info!(target: "scenario", session = %session.session_id, template = %template_id,
      events = template.events.len(), "Session started");

    self
      .sessions
      .write()
      .await
      .insert(session.session_id.clone(), Arc::new(Mutex::new(session)));

    Ok(started)
  }

  /// Reveal everything due by now and return the visible feed, in catalog
  /// order, with ground truth withheld.
  #[instrument(level = "debug", skip(self))]
  pub async fn poll(&self, session_id: &str) -> Result<Vec<FeedEvent>, EngineError> {
    let handle = self.session_handle(session_id).await?;
    let mut session = handle.lock().await;

    if session.status == SessionStatus::Finalized {
      return Err(EngineError::SessionClosed(session_id.to_string()));
    }

    let template = self.catalog.get(&session.template_id)?.clone();
    pacer::reveal(&mut session, &template.events, self.clock.now());

    // Released is always a prefix of the catalog, so a straight zip lines up.
    let feed = session
      .released
      .iter()
      .zip(template.events.iter())
      .map(|(rel, def)| FeedEvent {
        event_id: def.event_id.clone(),
        message: def.message.clone(),
        source: def.source.clone(),
        level: def.level,
        released_at: rel.released_at,
      })
      .collect();
    Ok(feed)
  }

  /// Record and score one learner response. One-shot per event: the released
  /// check, the duplicate check, and the insert all happen under the session
  /// lock, so a racing duplicate observes the first record.
  #[instrument(level = "info", skip(self), fields(%event_id))]
  pub async fn respond(
    &self,
    session_id: &str,
    event_id: &str,
    claimed_suspicious: bool,
    action: &str,
  ) -> Result<Evaluation, EngineError> {
    let claimed_action: Action = action.parse()?;

    let handle = self.session_handle(session_id).await?;
    let mut session = handle.lock().await;

    if session.status == SessionStatus::Finalized {
      return Err(EngineError::SessionClosed(session_id.to_string()));
    }

    let released_at = session
      .release_time(event_id)
      .ok_or_else(|| EngineError::EventNotReleased(event_id.to_string()))?;
    if session.responses.contains_key(event_id) {
      return Err(EngineError::DuplicateResponse(event_id.to_string()));
    }

    let template = self.catalog.get(&session.template_id)?;
    let event = template
      .events
      .iter()
      .find(|e| e.event_id == event_id)
      .ok_or_else(|| EngineError::EventNotReleased(event_id.to_string()))?;

    let submitted_at = self.clock.now();
    let evaluation = crate::evaluate::evaluate(event, claimed_suspicious, claimed_action);
    let response_time_seconds = (submitted_at - released_at).num_milliseconds() as f64 / 1000.0;

    info!(target: "scenario", session = %session_id, event = %event_id,
      score = evaluation.score, "Response evaluated");

    session.responses.insert(
      event_id.to_string(),
      ResponseRecord {
        event_id: event_id.to_string(),
        claimed_suspicious,
        claimed_action,
        submitted_at,
        response_time_seconds,
        evaluation: evaluation.clone(),
      },
    );

    Ok(evaluation)
  }

  /// Transition to FINALIZED and return the report. Idempotent: finalizing an
  /// already-finalized session just returns the same summary again.
  #[instrument(level = "info", skip(self))]
  pub async fn finalize(&self, session_id: &str) -> Result<SessionSummary, EngineError> {
    let handle = self.session_handle(session_id).await?;
    let mut session = handle.lock().await;
    let template = self.catalog.get(&session.template_id)?;

    if session.status == SessionStatus::Running {
      session.status = SessionStatus::Finalized;
      info!(target: "scenario", session = %session_id,
        responses = session.responses.len(), "Session finalized");
    }

    Ok(summary::summarize(&session, template))
  }

  /// Read-only summary, available mid-run (partial) or after finalize.
  #[instrument(level = "debug", skip(self))]
  pub async fn summary(&self, session_id: &str) -> Result<SessionSummary, EngineError> {
    let handle = self.session_handle(session_id).await?;
    let session = handle.lock().await;
    let template = self.catalog.get(&session.template_id)?;
    Ok(summary::summarize(&session, template))
  }
}
