//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to the engine. We reply with a single JSON message per request;
//! engine errors become `error` messages rather than closing the socket.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument, warn};

use crate::error::EngineError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "irsim_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "irsim_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "irsim_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "irsim_backend", "WebSocket disconnected");
}

fn ws_error(e: EngineError) -> ServerWsMessage {
  warn!(target: "scenario", error = %e, "WS request failed");
  ServerWsMessage::Error { message: e.to_string() }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartSession { template_id } => {
      match state.engine.start(&template_id).await {
        Ok(session) => {
          tracing::info!(target: "scenario", session = %session.session_id, template = %template_id,
            "WS session started");
          ServerWsMessage::SessionStarted { session }
        }
        Err(e) => ws_error(e),
      }
    }

    ClientWsMessage::PollEvents { session_id } => {
      match state.engine.poll(&session_id).await {
        Ok(events) => {
          let count = events.len();
          ServerWsMessage::Events { session_id, events, count }
        }
        Err(e) => ws_error(e),
      }
    }

    ClientWsMessage::SubmitResponse { session_id, event_id, suspicious, action } => {
      match state.engine.respond(&session_id, &event_id, suspicious, &action).await {
        Ok(evaluation) => {
          tracing::info!(target: "scenario", session = %session_id, event = %event_id,
            score = evaluation.score, "WS response evaluated");
          ServerWsMessage::Evaluation { event_id, evaluation }
        }
        Err(e) => ws_error(e),
      }
    }

    ClientWsMessage::FinalizeSession { session_id } => {
      match state.engine.finalize(&session_id).await {
        Ok(summary) => {
          tracing::info!(target: "scenario", session = %session_id, grade = %summary.grade,
            "WS session finalized");
          ServerWsMessage::Summary { summary }
        }
        Err(e) => ws_error(e),
      }
    }
  }
}
