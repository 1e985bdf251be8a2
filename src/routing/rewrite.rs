//! Upstream URL construction.
//!
//! The upstream target is plain concatenation of origin, stripped path and
//! query. Nothing is decoded, re-encoded or normalized, so API keys and model
//! names in the path or query reach the upstream exactly as sent.

/// Build `origin + path + ?query`.
///
/// `query` is the raw query string without its `?`, as returned by
/// [`http::Uri::query`](axum::http::Uri::query). `Some("")` keeps a bare `?`.
pub fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let query_len = query.map_or(0, |q| q.len() + 1);
    let mut url = String::with_capacity(origin.len() + path.len() + query_len);
    url.push_str(origin);
    url.push_str(path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}
