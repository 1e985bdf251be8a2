//! Inbound request helpers.
//!
//! # Responsibilities
//! - Read the request ID assigned by the request-id layer
//! - Decide whether a method's body is forwarded
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - GET and HEAD never forward a body, even if the client sent one

use axum::http::{HeaderMap, Method};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID of a request, or `"unknown"` if none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Returns true if the inbound body is forwarded for `method`.
pub fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}
