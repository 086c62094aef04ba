//! Injectable clock so event pacing is testable without real sleeps.

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for the engine. Injected so tests can drive time by hand.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used in production.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Manually advanced clock for deterministic runs.
#[allow(dead_code)]
#[derive(Debug)]
pub struct ManualClock {
  now: std::sync::Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self { now: std::sync::Mutex::new(start) }
  }

  pub fn advance_secs(&self, secs: i64) {
    let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
    *now += Duration::seconds(secs);
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(|e| e.into_inner())
  }
}
