//! Loading the optional scenario bank from TOML.
//!
//! `SCENARIO_CONFIG_PATH` points at a TOML file with extra scenario
//! templates. Entries are validated when the catalog is built; malformed
//! entries are logged and skipped rather than failing startup.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Severity;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ScenarioConfig {
  #[serde(default)]
  pub templates: Vec<TemplateCfg>,
}

/// Scenario template entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct TemplateCfg {
  pub id: String,
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub difficulty: Option<String>,
  #[serde(default)] pub events: Vec<EventCfg>,
}

/// Event entry accepted in TOML configuration. `correct_action` is a string
/// here and parsed against the fixed action set when the catalog is built.
#[derive(Clone, Debug, Deserialize)]
pub struct EventCfg {
  #[serde(default)] pub id: Option<String>,
  pub message: String,
  pub source: String,
  #[serde(default)] pub level: Option<Severity>,
  #[serde(default)] pub suspicious: bool,
  pub correct_action: String,
  #[serde(default)] pub min_delay_seconds: u64,
  #[serde(default)] pub max_delay_seconds: u64,
}

/// Attempt to load `ScenarioConfig` from SCENARIO_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_scenario_config_from_env() -> Option<ScenarioConfig> {
  let path = std::env::var("SCENARIO_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ScenarioConfig>(&s) {
      Ok(cfg) => {
        info!(target: "irsim_backend", %path, "Loaded scenario config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "irsim_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "irsim_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
