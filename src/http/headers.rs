//! Header pass-through rules.
//!
//! # Responsibilities
//! - Copy end-to-end headers between client and upstream unchanged
//! - Drop hop-by-hop headers, which describe a single connection only
//!
//! # Design Decisions
//! - Credentials (authorization, x-api-key, ...) are never inspected
//! - Headers listed in `Connection` are treated as hop-by-hop (RFC 9110 §7.6.1)
//! - Repeated headers keep every value and their order

use axum::http::{header, HeaderMap, HeaderName};

/// Connection-level headers that a proxy must not forward.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Returns true for headers that apply to a single connection.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Copy every end-to-end header from `headers`.
pub fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let nominated: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || nominated.iter().any(|t| t == name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
