//! Event pacing: cumulative random reveal schedule plus lazy release.
//!
//! Release is computed from elapsed wall-clock time at poll time, never pushed
//! by a timer. The per-event delay is drawn exactly once per session (at
//! start) and cached on the session, so repeated polls always observe the same
//! reveal times. Delays are cumulative by construction: event k+1 can never
//! come due before event k, and the released list is always a prefix of
//! catalog order.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::{EventDefinition, ReleasedEvent, Session};

/// Draw the cumulative reveal offsets (in seconds) for one session.
///
/// The first event opens the feed immediately (`offset[0] = 0`); each later
/// event is due `draw(min, max)` seconds after the previous one, sampled
/// uniformly over the inclusive window.
pub fn draw_schedule<R: Rng + ?Sized>(rng: &mut R, events: &[EventDefinition]) -> Vec<u64> {
  let mut offsets = Vec::with_capacity(events.len());
  let mut acc: u64 = 0;
  for (k, ev) in events.iter().enumerate() {
    if k > 0 {
      let hi = ev.max_delay_seconds.max(ev.min_delay_seconds);
      acc = acc.saturating_add(rng.gen_range(ev.min_delay_seconds..=hi));
    }
    offsets.push(acc);
  }
  offsets
}

/// Append every event that has come due, in catalog order. Idempotent:
/// re-running with the same or a later `now` never un-releases anything.
pub fn reveal(session: &mut Session, events: &[EventDefinition], now: DateTime<Utc>) {
  let elapsed = (now - session.started_at).num_seconds().max(0) as u64;
  for k in session.released.len()..events.len() {
    let due = session.schedule.get(k).copied().unwrap_or(u64::MAX);
    if elapsed < due {
      break;
    }
    let offset = Duration::seconds(i64::try_from(due).unwrap_or(i64::MAX));
    session.released.push(ReleasedEvent {
      event_id: events[k].event_id.clone(),
      released_at: session.started_at + offset,
    });
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::Utc;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;
  use crate::domain::{Action, SessionStatus, Severity};

  fn event(id: &str, min: u64, max: u64) -> EventDefinition {
    EventDefinition {
      event_id: id.into(),
      message: format!("event {id}"),
      source: "Test".into(),
      level: Severity::Info,
      is_suspicious: false,
      correct_action: Action::Monitor,
      min_delay_seconds: min,
      max_delay_seconds: max,
    }
  }

  fn session(schedule: Vec<u64>) -> Session {
    Session {
      session_id: "s1".into(),
      template_id: "t1".into(),
      started_at: Utc::now(),
      status: SessionStatus::Running,
      schedule,
      released: Vec::new(),
      responses: HashMap::new(),
    }
  }

  #[test]
  fn first_offset_is_zero_and_offsets_accumulate() {
    let events = vec![event("a", 9, 9), event("b", 5, 5), event("c", 2, 2)];
    let mut rng = StdRng::seed_from_u64(1);
    let schedule = draw_schedule(&mut rng, &events);
    // The first event's own window is ignored: the feed opens at once.
    assert_eq!(schedule, vec![0, 5, 7]);
  }

  #[test]
  fn draws_stay_inside_the_inclusive_window() {
    let events = vec![event("a", 0, 0), event("b", 3, 7), event("c", 3, 7)];
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
      let schedule = draw_schedule(&mut rng, &events);
      let d1 = schedule[1] - schedule[0];
      let d2 = schedule[2] - schedule[1];
      assert!((3..=7).contains(&d1), "delay out of window: {d1}");
      assert!((3..=7).contains(&d2), "delay out of window: {d2}");
    }
  }

  #[test]
  fn same_seed_draws_the_same_schedule() {
    let events: Vec<_> = (0..10).map(|i| event(&format!("e{i}"), 3, 7)).collect();
    let a = draw_schedule(&mut StdRng::seed_from_u64(99), &events);
    let b = draw_schedule(&mut StdRng::seed_from_u64(99), &events);
    assert_eq!(a, b);
  }

  #[test]
  fn release_follows_elapsed_time_and_is_a_prefix() {
    let events = vec![event("a", 0, 0), event("b", 5, 5)];
    let mut s = session(vec![0, 5]);
    let t0 = s.started_at;

    reveal(&mut s, &events, t0);
    assert_eq!(s.released.len(), 1);
    assert_eq!(s.released[0].event_id, "a");

    // Polling again at the same instant changes nothing.
    reveal(&mut s, &events, t0);
    assert_eq!(s.released.len(), 1);

    reveal(&mut s, &events, t0 + Duration::seconds(4));
    assert_eq!(s.released.len(), 1);

    reveal(&mut s, &events, t0 + Duration::seconds(5));
    assert_eq!(s.released.len(), 2);
    assert_eq!(s.released[1].event_id, "b");
    // Release times come from the schedule, not from poll timing.
    assert_eq!(s.released[1].released_at, t0 + Duration::seconds(5));
  }

  #[test]
  fn reveal_never_shrinks_even_if_the_clock_steps_back() {
    let events = vec![event("a", 0, 0), event("b", 2, 2), event("c", 2, 2)];
    let mut s = session(vec![0, 2, 4]);
    let t0 = s.started_at;

    reveal(&mut s, &events, t0 + Duration::seconds(10));
    assert_eq!(s.released.len(), 3);

    reveal(&mut s, &events, t0);
    assert_eq!(s.released.len(), 3);
  }

  #[test]
  fn a_burst_of_due_events_is_released_in_catalog_order() {
    let events: Vec<_> = (0..5).map(|i| event(&format!("e{i}"), 1, 1)).collect();
    let mut s = session(vec![0, 1, 2, 3, 4]);
    let t0 = s.started_at;

    reveal(&mut s, &events, t0 + Duration::seconds(100));
    let ids: Vec<_> = s.released.iter().map(|r| r.event_id.as_str()).collect();
    assert_eq!(ids, vec!["e0", "e1", "e2", "e3", "e4"]);
  }
}
