//! Event catalog: built-in scenario templates plus the optional TOML bank.
//!
//! Templates are immutable after load and shared read-only across sessions.
//! The event sequence order is the canonical reveal order; later events may
//! depend narratively on earlier ones, but the engine treats order purely as
//! release priority.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::config::{ScenarioConfig, TemplateCfg};
use crate::domain::{Action, EventDefinition, ScenarioTemplate, Severity};
use crate::error::EngineError;

pub struct Catalog {
  templates: HashMap<String, Arc<ScenarioTemplate>>,
}

impl Catalog {
  /// Build the catalog: bank templates first (config wins on id collision),
  /// then built-ins for any id not already taken.
  pub fn new(cfg: Option<&ScenarioConfig>) -> Self {
    let mut templates = HashMap::<String, Arc<ScenarioTemplate>>::new();

    if let Some(cfg) = cfg {
      for tc in &cfg.templates {
        match template_from_cfg(tc) {
          Some(t) => {
            templates.insert(t.template_id.clone(), Arc::new(t));
          }
          None => continue,
        }
      }
    }

    for t in builtin_templates() {
      templates.entry(t.template_id.clone()).or_insert_with(|| Arc::new(t));
    }

    Self { templates }
  }

  pub fn get(&self, template_id: &str) -> Result<&Arc<ScenarioTemplate>, EngineError> {
    self
      .templates
      .get(template_id)
      .ok_or_else(|| EngineError::UnknownTemplate(template_id.to_string()))
  }

  /// Ordered event sequence for a template.
  #[allow(dead_code)]
  pub fn events_for(&self, template_id: &str) -> Result<&[EventDefinition], EngineError> {
    Ok(&self.get(template_id)?.events)
  }

  /// All templates, sorted by id for a stable listing.
  pub fn list(&self) -> Vec<&ScenarioTemplate> {
    let mut all: Vec<_> = self.templates.values().map(Arc::as_ref).collect();
    all.sort_by(|a, b| a.template_id.cmp(&b.template_id));
    all
  }
}

/// Validate one bank entry. A template with any invalid event is dropped
/// whole, since skipping individual events would change the narrative order.
fn template_from_cfg(tc: &TemplateCfg) -> Option<ScenarioTemplate> {
  if tc.events.is_empty() {
    error!(target: "scenario", template = %tc.id, "Skipping bank template: no events.");
    return None;
  }

  let mut events = Vec::with_capacity(tc.events.len());
  for ec in &tc.events {
    let event_id = ec.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let correct_action: Action = match ec.correct_action.parse() {
      Ok(a) => a,
      Err(e) => {
        error!(target: "scenario", template = %tc.id, event = %event_id, error = %e,
          "Skipping bank template: bad correct_action.");
        return None;
      }
    };
    if ec.min_delay_seconds > ec.max_delay_seconds {
      error!(target: "scenario", template = %tc.id, event = %event_id,
        min = ec.min_delay_seconds, max = ec.max_delay_seconds,
        "Skipping bank template: min delay exceeds max.");
      return None;
    }
    events.push(EventDefinition {
      event_id,
      message: ec.message.clone(),
      source: ec.source.clone(),
      level: ec.level.unwrap_or(Severity::Info),
      is_suspicious: ec.suspicious,
      correct_action,
      min_delay_seconds: ec.min_delay_seconds,
      max_delay_seconds: ec.max_delay_seconds,
    });
  }

  Some(ScenarioTemplate {
    template_id: tc.id.clone(),
    name: tc.name.clone().unwrap_or_else(|| tc.id.clone()),
    description: tc.description.clone().unwrap_or_default(),
    difficulty: tc.difficulty.clone().unwrap_or_else(|| "intermediate".into()),
    events,
  })
}

fn ev(
  event_id: &str,
  message: &str,
  source: &str,
  level: Severity,
  is_suspicious: bool,
  correct_action: Action,
  min_delay_seconds: u64,
  max_delay_seconds: u64,
) -> EventDefinition {
  EventDefinition {
    event_id: event_id.into(),
    message: message.into(),
    source: source.into(),
    level,
    is_suspicious,
    correct_action,
    min_delay_seconds,
    max_delay_seconds,
  }
}

/// Built-in scenarios so the server is useful without any configuration.
///
/// `advanced_phishing` tells one attack story: a phishing attachment on a
/// marketing workstation escalating through lateral movement and exfiltration
/// to ransomware, interleaved with ordinary office noise.
fn builtin_templates() -> Vec<ScenarioTemplate> {
  use Action::*;
  use Severity::*;

  let events = vec![
    ev("evt_001", "User alice.smith logged into workstation WS-MARKETING-01", "Active Directory", Info, false, Monitor, 0, 0),
    ev("evt_002", "Suspicious email attachment opened on WS-MARKETING-01", "Email Gateway", Warning, true, Isolate, 3, 7),
    ev("evt_003", "Scheduled backup completed successfully on SERVER-FILE-01", "Backup System", Info, false, Monitor, 3, 7),
    ev("evt_004", "Outbound connection to suspicious domain: secure-bank-login.com", "Firewall", Warning, true, BlockIp, 3, 7),
    ev("evt_005", "User bob.jones accessed shared folder /marketing/campaigns", "File Server", Info, false, Monitor, 3, 7),
    ev("evt_006", "Unusual PowerShell execution detected on WS-MARKETING-01", "EDR System", Critical, true, Isolate, 3, 7),
    ev("evt_007", "Print job completed on PRINTER-02", "Print Server", Info, false, Monitor, 3, 7),
    ev("evt_008", "Multiple failed login attempts for admin account", "Domain Controller", Warning, true, Monitor, 3, 7),
    ev("evt_009", "Routine system update installed on WS-HR-03", "WSUS", Info, false, Monitor, 3, 7),
    ev("evt_010", "Lateral movement detected: WS-MARKETING-01 -> SERVER-FILE-01", "Network Monitor", Critical, true, Isolate, 3, 7),
    ev("evt_011", "User charlie.brown logged out from WS-SALES-02", "Active Directory", Info, false, Monitor, 3, 7),
    ev("evt_012", "Large data transfer detected: SERVER-FILE-01 -> external IP", "DLP System", Critical, true, Escalate, 3, 7),
    ev("evt_013", "Daily antivirus scan completed on WS-RECEPTION-01", "Antivirus", Info, false, Monitor, 3, 7),
    ev("evt_014", "Encrypted files detected on multiple workstations", "File System Monitor", Critical, true, Shutdown, 3, 7),
    ev("evt_015", "Email sync completed for user@company.com", "Exchange Server", Info, false, Monitor, 3, 7),
    ev("evt_016", "Ransom note file created: README_DECRYPT.txt", "File System Monitor", Critical, true, Escalate, 3, 7),
  ];

  vec![ScenarioTemplate {
    template_id: "advanced_phishing".into(),
    name: "Advanced Multi-Stage Attack".into(),
    description: "Complex phishing attack that escalates to lateral movement and data exfiltration".into(),
    difficulty: "intermediate".into(),
    events,
  }]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::EventCfg;

  #[test]
  fn builtin_scenario_is_always_available() {
    let catalog = Catalog::new(None);
    let t = catalog.get("advanced_phishing").expect("builtin");
    assert_eq!(t.events.len(), 16);
    assert_eq!(t.events.iter().filter(|e| e.is_suspicious).count(), 8);
    // First event opens the feed immediately.
    assert_eq!(t.events[0].min_delay_seconds, 0);
    assert!(t.events.iter().all(|e| e.min_delay_seconds <= e.max_delay_seconds));
  }

  #[test]
  fn unknown_template_fails_with_not_found() {
    let catalog = Catalog::new(None);
    let err = catalog.events_for("no_such_scenario").unwrap_err();
    assert!(matches!(err, EngineError::UnknownTemplate(_)));
  }

  fn bank_event(action: &str, min: u64, max: u64) -> EventCfg {
    EventCfg {
      id: Some("evt_001".into()),
      message: "Removable media mounted".into(),
      source: "Endpoint Agent".into(),
      level: Some(Severity::Warning),
      suspicious: true,
      correct_action: action.into(),
      min_delay_seconds: min,
      max_delay_seconds: max,
    }
  }

  fn bank_template(events: Vec<EventCfg>) -> ScenarioConfig {
    ScenarioConfig {
      templates: vec![TemplateCfg {
        id: "usb_drop".into(),
        name: Some("USB Drop Attack".into()),
        description: None,
        difficulty: None,
        events,
      }],
    }
  }

  #[test]
  fn bank_template_is_merged_alongside_builtins() {
    let cfg = bank_template(vec![bank_event("isolate", 2, 6)]);
    let catalog = Catalog::new(Some(&cfg));
    assert!(catalog.get("usb_drop").is_ok());
    assert!(catalog.get("advanced_phishing").is_ok());
    assert_eq!(catalog.list().len(), 2);
  }

  #[test]
  fn bank_template_with_bad_action_is_dropped_whole() {
    let cfg = bank_template(vec![bank_event("unplug", 2, 6)]);
    let catalog = Catalog::new(Some(&cfg));
    assert!(catalog.get("usb_drop").is_err());
  }

  #[test]
  fn bank_template_with_inverted_delay_window_is_dropped() {
    let cfg = bank_template(vec![bank_event("isolate", 6, 2)]);
    let catalog = Catalog::new(Some(&cfg));
    assert!(catalog.get("usb_drop").is_err());
  }
}
