//! Engine error taxonomy and its HTTP mapping.
//!
//! Every variant is local to a single request; a failed operation leaves the
//! session store untouched. The [`IntoResponse`] impl keeps the distinctions a
//! client needs: bad identifier (404), invalid input (400), invalid state
//! (409, e.g. "already submitted"), and client/engine desync (412).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by the scenario session engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested scenario template does not exist.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// The requested session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session is finalized; no further polls or responses are accepted.
    #[error("session is finalized: {0}")]
    SessionClosed(String),

    /// The event exists but has not been revealed to this session yet
    /// (or the event_id is not part of the session's catalog at all).
    #[error("event not released: {0}")]
    EventNotReleased(String),

    /// The event already has a recorded response; submission is one-shot.
    #[error("response already submitted for event: {0}")]
    DuplicateResponse(String),

    /// The claimed action is not one of the fixed action values.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl EngineError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownTemplate(_) | Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SessionClosed(_) | Self::DuplicateResponse(_) => StatusCode::CONFLICT,
            Self::EventNotReleased(_) => StatusCode::PRECONDITION_FAILED,
            Self::UnknownAction(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_distinct_status_classes() {
        assert_eq!(
            EngineError::SessionNotFound("s1".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::DuplicateResponse("evt_001".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EngineError::SessionClosed("s1".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EngineError::EventNotReleased("evt_009".into()).status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            EngineError::UnknownAction("reboot".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
