//! Response evaluation: fixed 25+25 rubric and a deterministic feedback table.
//!
//! Suspicion classification and action choice are scored independently, 25
//! points each. Feedback is keyed purely by the (correct_suspicion,
//! correct_action) pair plus the event's ground truth, so identical answers
//! always produce identical text.

use crate::domain::{Action, Evaluation, EventDefinition, Severity};

pub const SUSPICION_POINTS: u32 = 25;
pub const ACTION_POINTS: u32 = 25;
pub const MAX_EVENT_SCORE: u32 = SUSPICION_POINTS + ACTION_POINTS;

/// Score one learner response against an event's ground truth.
pub fn evaluate(event: &EventDefinition, claimed_suspicious: bool, claimed_action: Action) -> Evaluation {
  let correct_suspicion = claimed_suspicious == event.is_suspicious;
  let correct_action = claimed_action == event.correct_action;

  let mut score = 0;
  if correct_suspicion {
    score += SUSPICION_POINTS;
  }
  if correct_action {
    score += ACTION_POINTS;
  }

  Evaluation {
    correct_suspicion,
    correct_action,
    score,
    feedback: feedback_lines(event, correct_suspicion, correct_action),
  }
}

fn feedback_lines(event: &EventDefinition, correct_suspicion: bool, correct_action: bool) -> Vec<String> {
  let mut lines = Vec::with_capacity(2);

  match (correct_suspicion, event.is_suspicious) {
    (true, true) => lines.push("Good catch: this event is a genuine threat indicator.".into()),
    (true, false) => lines.push("Correct: this is routine activity, not a threat.".into()),
    (false, true) => lines.push(
      "Missed threat: this event was suspicious. Watch for wording like 'suspicious', \
       'unusual', or repeated failed attempts."
        .into(),
    ),
    (false, false) => lines.push(
      "False alarm: this was routine activity. Backups, updates, and ordinary \
       logins/logouts are expected noise."
        .into(),
    ),
  }

  if correct_action {
    lines.push("Good call on the response action.".into());
  } else if event.is_suspicious && event.level == Severity::Critical {
    lines.push(format!(
      "A CRITICAL event needs a stronger response; the expected action here is '{}'.",
      event.correct_action
    ));
  } else if event.is_suspicious {
    lines.push(format!(
      "A suspicious event needs containment; the expected action here is '{}'.",
      event.correct_action
    ));
  } else {
    lines.push(format!(
      "For routine activity, '{}' is enough.",
      event.correct_action
    ));
  }

  lines
}
