//! Session summary aggregation: a pure fold over recorded responses.
//!
//! `max_possible_score` counts the full catalog, not just released or
//! answered events, so leaving events unanswered costs points. Accuracy
//! percentages are over answered events only (0 when nothing was answered).

use crate::domain::{ScenarioTemplate, Session, SessionSummary};
use crate::evaluate::MAX_EVENT_SCORE;

/// Fold a session's responses into a report. Pure: no session mutation, safe
/// to call mid-run for a partial summary and again at finalize.
pub fn summarize(session: &Session, template: &ScenarioTemplate) -> SessionSummary {
  let total_events = template.events.len();
  let total_suspicious_events = template.events.iter().filter(|e| e.is_suspicious).count();

  let events_responded_to = session.responses.len();
  let correct_suspicions = session
    .responses
    .values()
    .filter(|r| r.evaluation.correct_suspicion)
    .count();
  let correct_actions = session
    .responses
    .values()
    .filter(|r| r.evaluation.correct_action)
    .count();
  let total_score: u32 = session.responses.values().map(|r| r.evaluation.score).sum();

  let max_possible_score = MAX_EVENT_SCORE * total_events as u32;
  let score_pct = if max_possible_score > 0 {
    100.0 * f64::from(total_score) / f64::from(max_possible_score)
  } else {
    0.0
  };

  SessionSummary {
    session_id: session.session_id.clone(),
    scenario_name: template.name.clone(),
    total_events,
    total_suspicious_events,
    events_responded_to,
    correct_suspicions,
    correct_actions,
    total_score,
    max_possible_score,
    suspicion_accuracy: accuracy(correct_suspicions, events_responded_to),
    action_accuracy: accuracy(correct_actions, events_responded_to),
    grade: grade(score_pct),
  }
}

fn accuracy(correct: usize, responded: usize) -> f64 {
  if responded == 0 {
    return 0.0;
  }
  round1(100.0 * correct as f64 / responded as f64)
}

/// Letter grade on overall score percentage: >=90 A, >=80 B, >=70 C, >=60 D.
pub fn grade(score_pct: f64) -> char {
  if score_pct >= 90.0 {
    'A'
  } else if score_pct >= 80.0 {
    'B'
  } else if score_pct >= 70.0 {
    'C'
  } else if score_pct >= 60.0 {
    'D'
  } else {
    'F'
  }
}

fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::Utc;

  use super::*;
  use crate::domain::{
    Action, EventDefinition, ResponseRecord, SessionStatus, Severity,
  };
  use crate::evaluate::evaluate;

  fn template(n: usize, suspicious_every: usize) -> ScenarioTemplate {
    let events = (0..n)
      .map(|i| EventDefinition {
        event_id: format!("evt_{i:03}"),
        message: format!("event {i}"),
        source: "Test".into(),
        level: Severity::Info,
        is_suspicious: suspicious_every > 0 && i % suspicious_every == 0,
        correct_action: Action::Monitor,
        min_delay_seconds: 0,
        max_delay_seconds: 0,
      })
      .collect();
    ScenarioTemplate {
      template_id: "t1".into(),
      name: "Test Scenario".into(),
      description: String::new(),
      difficulty: "test".into(),
      events,
    }
  }

  fn empty_session() -> Session {
    Session {
      session_id: "s1".into(),
      template_id: "t1".into(),
      started_at: Utc::now(),
      status: SessionStatus::Running,
      schedule: Vec::new(),
      released: Vec::new(),
      responses: HashMap::new(),
    }
  }

  fn answer(session: &mut Session, event: &EventDefinition, suspicious: bool, action: Action) {
    let evaluation = evaluate(event, suspicious, action);
    session.responses.insert(
      event.event_id.clone(),
      ResponseRecord {
        event_id: event.event_id.clone(),
        claimed_suspicious: suspicious,
        claimed_action: action,
        submitted_at: Utc::now(),
        response_time_seconds: 1.0,
        evaluation,
      },
    );
  }

  #[test]
  fn max_possible_score_counts_the_full_catalog() {
    let tpl = template(16, 3);
    let s = empty_session();
    let sum = summarize(&s, &tpl);
    assert_eq!(sum.max_possible_score, 800);
    assert_eq!(sum.total_events, 16);
    assert_eq!(sum.events_responded_to, 0);
    assert_eq!(sum.total_score, 0);
    assert_eq!(sum.grade, 'F');
  }

  #[test]
  fn no_responses_means_zero_accuracy_not_a_division_error() {
    let tpl = template(4, 2);
    let sum = summarize(&empty_session(), &tpl);
    assert_eq!(sum.suspicion_accuracy, 0.0);
    assert_eq!(sum.action_accuracy, 0.0);
  }

  #[test]
  fn accuracies_are_over_answered_events_only() {
    let tpl = template(4, 0); // all benign, correct action = monitor
    let mut s = empty_session();
    answer(&mut s, &tpl.events[0], false, Action::Monitor); // 50
    answer(&mut s, &tpl.events[1], true, Action::Monitor); // 25
    let sum = summarize(&s, &tpl);
    assert_eq!(sum.events_responded_to, 2);
    assert_eq!(sum.correct_suspicions, 1);
    assert_eq!(sum.correct_actions, 2);
    assert_eq!(sum.total_score, 75);
    assert_eq!(sum.suspicion_accuracy, 50.0);
    assert_eq!(sum.action_accuracy, 100.0);
  }

  #[test]
  fn grade_thresholds() {
    assert_eq!(grade(95.0), 'A');
    assert_eq!(grade(90.0), 'A');
    assert_eq!(grade(89.9), 'B');
    assert_eq!(grade(80.0), 'B');
    assert_eq!(grade(70.0), 'C');
    assert_eq!(grade(60.0), 'D');
    assert_eq!(grade(59.9), 'F');
    assert_eq!(grade(0.0), 'F');
  }

  #[test]
  fn perfect_run_grades_a() {
    let tpl = template(4, 0);
    let mut s = empty_session();
    for ev in &tpl.events {
      answer(&mut s, ev, false, Action::Monitor);
    }
    let sum = summarize(&s, &tpl);
    assert_eq!(sum.total_score, sum.max_possible_score);
    assert_eq!(sum.grade, 'A');
  }
}
