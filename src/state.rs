//! Application state: scenario catalog, engine construction, and the startup
//! inventory log.
//!
//! This module owns:
//!   - the scenario catalog (built-ins merged with the optional TOML bank)
//!   - the scenario engine (session store + lifecycle controller)
//!
//! The engine gets the system wall clock in production; `RNG_SEED` pins the
//! reveal-delay randomness for reproducible demo runs.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::load_scenario_config_from_env;
use crate::engine::ScenarioEngine;

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub engine: ScenarioEngine,
}

impl AppState {
    /// Build state from env: load the scenario bank, build the catalog,
    /// construct the engine.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_scenario_config_from_env();
        let catalog = Arc::new(Catalog::new(cfg.as_ref()));

        for t in catalog.list() {
            let suspicious = t.events.iter().filter(|e| e.is_suspicious).count();
            info!(target: "scenario", template = %t.template_id, difficulty = %t.difficulty,
                events = t.events.len(), suspicious, "Startup scenario inventory");
        }

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let engine = match std::env::var("RNG_SEED").ok().and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => {
                info!(target: "irsim_backend", seed, "Using fixed RNG seed for reveal pacing");
                ScenarioEngine::with_seed(catalog.clone(), clock, seed)
            }
            None => ScenarioEngine::new(catalog.clone(), clock),
        };

        Self { catalog, engine }
    }
}
