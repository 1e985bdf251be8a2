//! Relay-generated responses.
//!
//! # Responsibilities
//! - Map forwarding errors to HTTP status codes
//! - Produce the plain-text "unknown route" response
//!
//! # Design Decisions
//! - Upstream responses are never rewritten here; only failures the relay
//!   itself detects produce a response of its own
//! - Transport failures (connect timeouts included) are 502; only the
//!   response-header deadline produces 504

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body returned for paths that match no route.
pub const UNKNOWN_ROUTE: &str = "Unknown route";

/// 404 with a plain-text body.
pub fn unknown_route() -> Response {
    (StatusCode::NOT_FOUND, UNKNOWN_ROUTE).into_response()
}

/// Failure while forwarding a request upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream target {0:?}")]
    InvalidTarget(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("upstream sent no response within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::BAD_REQUEST => "Bad request target",
            StatusCode::GATEWAY_TIMEOUT => "Upstream timed out",
            _ => "Upstream request failed",
        };
        (status, body).into_response()
    }
}
