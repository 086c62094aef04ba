//! Irsim · Incident Response Trainer Backend
//!
//! - Axum HTTP + WebSocket API
//! - Scenario session engine: timed event release, one-shot response scoring,
//!   session summaries
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   SCENARIO_CONFIG_PATH : path to TOML config (extra scenario templates)
//!   RNG_SEED             : u64, pins reveal-delay randomness (demo/debug)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod telemetry;
mod error;
mod domain;
mod clock;
mod config;
mod catalog;
mod pacer;
mod evaluate;
mod summary;
mod engine;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (scenario catalog + session engine).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "irsim_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
