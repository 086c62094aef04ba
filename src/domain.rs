//! Domain models for the scenario session engine: event definitions, scenario
//! templates, sessions, learner responses, evaluations, and the final summary.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Remediation actions a learner can pick for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  Monitor,
  Isolate,
  BlockIp,
  Escalate,
  Shutdown,
}

impl Action {
  pub fn as_str(&self) -> &'static str {
    match self {
      Action::Monitor => "monitor",
      Action::Isolate => "isolate",
      Action::BlockIp => "block_ip",
      Action::Escalate => "escalate",
      Action::Shutdown => "shutdown",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Action {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "monitor" => Ok(Action::Monitor),
      "isolate" => Ok(Action::Isolate),
      "block_ip" => Ok(Action::BlockIp),
      "escalate" => Ok(Action::Escalate),
      "shutdown" => Ok(Action::Shutdown),
      _ => Err(EngineError::UnknownAction(s.to_string())),
    }
  }
}

/// Severity shown to the learner in the feed. Presentation data, not ground
/// truth: a CRITICAL line can still be benign noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
  Info,
  Warning,
  Critical,
}

impl Severity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Severity::Info => "INFO",
      Severity::Warning => "WARNING",
      Severity::Critical => "CRITICAL",
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One synthetic security event in a scenario template.
/// `is_suspicious` and `correct_action` are ground truth and must never reach
/// the learner-facing feed (see [`FeedEvent`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventDefinition {
  pub event_id: String,
  pub message: String,
  pub source: String,
  pub level: Severity,
  pub is_suspicious: bool,
  pub correct_action: Action,
  /// Reveal window relative to the previous event's reveal, inclusive.
  pub min_delay_seconds: u64,
  pub max_delay_seconds: u64,
}

/// Static, ordered definition of all events for one scenario type.
/// Immutable after load; shared read-only across sessions.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioTemplate {
  pub template_id: String,
  pub name: String,
  pub description: String,
  pub difficulty: String, // free-form (e.g., "intermediate")
  pub events: Vec<EventDefinition>,
}

/// Session state machine: RUNNING until finalized, FINALIZED is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  Running,
  Finalized,
}

/// One event already revealed into a session's feed.
#[derive(Clone, Debug)]
pub struct ReleasedEvent {
  pub event_id: String,
  pub released_at: DateTime<Utc>,
}

/// One learner's timed run through a template.
///
/// `released` is append-only and always a prefix of the template's event
/// order. `responses` is write-once per event_id and only ever contains ids
/// already present in `released`.
#[derive(Clone, Debug)]
pub struct Session {
  pub session_id: String,
  pub template_id: String,
  pub started_at: DateTime<Utc>,
  pub status: SessionStatus,
  /// Cumulative reveal offsets in seconds, one per catalog event, drawn once
  /// at session start and never re-rolled.
  pub schedule: Vec<u64>,
  pub released: Vec<ReleasedEvent>,
  pub responses: HashMap<String, ResponseRecord>,
}

impl Session {
  /// Release time of an event, if it has been revealed to this session.
  pub fn release_time(&self, event_id: &str) -> Option<DateTime<Utc>> {
    self
      .released
      .iter()
      .find(|r| r.event_id == event_id)
      .map(|r| r.released_at)
  }
}

/// One learner answer, recorded together with its evaluation.
#[derive(Clone, Debug)]
pub struct ResponseRecord {
  pub event_id: String,
  pub claimed_suspicious: bool,
  pub claimed_action: Action,
  pub submitted_at: DateTime<Utc>,
  /// Advisory only: how long after the reveal the answer arrived. Late
  /// answers are still accepted and scored the same way.
  pub response_time_seconds: f64,
  pub evaluation: Evaluation,
}

/// Scoring outcome for one response (fixed 25+25 rubric).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
  pub correct_suspicion: bool,
  pub correct_action: bool,
  pub score: u32,
  pub feedback: Vec<String>,
}

/// Learner-facing view of a released event. Ground truth is withheld by
/// construction: this struct simply has no suspicion/action fields.
#[derive(Clone, Debug, Serialize)]
pub struct FeedEvent {
  pub event_id: String,
  pub message: String,
  pub source: String,
  pub level: Severity,
  pub released_at: DateTime<Utc>,
}

/// Confirmation returned when a session starts.
#[derive(Clone, Debug, Serialize)]
pub struct SessionStarted {
  pub session_id: String,
  pub template_id: String,
  pub scenario_name: String,
  pub total_events: usize,
  pub status: SessionStatus,
}

/// Finalized (or partial, while running) session report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
  pub session_id: String,
  pub scenario_name: String,
  pub total_events: usize,
  pub total_suspicious_events: usize,
  pub events_responded_to: usize,
  pub correct_suspicions: usize,
  pub correct_actions: usize,
  pub total_score: u32,
  pub max_possible_score: u32,
  pub suspicion_accuracy: f64,
  pub action_accuracy: f64,
  pub grade: char,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn action_parses_all_known_values() {
    for (s, a) in [
      ("monitor", Action::Monitor),
      ("isolate", Action::Isolate),
      ("block_ip", Action::BlockIp),
      ("escalate", Action::Escalate),
      ("shutdown", Action::Shutdown),
    ] {
      assert_eq!(s.parse::<Action>().expect("known action"), a);
      assert_eq!(a.as_str(), s);
    }
  }

  #[test]
  fn action_parse_is_lenient_about_case_and_spacing() {
    assert_eq!(" Isolate ".parse::<Action>().expect("action"), Action::Isolate);
  }

  #[test]
  fn unknown_action_is_rejected() {
    let err = "format_disk".parse::<Action>().unwrap_err();
    assert!(matches!(err, EngineError::UnknownAction(a) if a == "format_disk"));
  }
}
