//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the rewritten upstream URL
//! - Stream request and response bodies without buffering
//! - Return upstream responses verbatim, redirects included
//!
//! # Design Decisions
//! - The target is sent as an `http::Uri`, so path and query bytes reach the
//!   upstream exactly as the caller sent them (no re-encoding, no dot-segment
//!   resolution)
//! - Redirects are never followed; a 3xx goes back to the caller as-is
//! - No retries: a failed upstream call is reported once
//! - The deadline covers the wait for response headers only, so long
//!   streaming completions are not cut off
//! - Dropping the returned future (client went away) drops the upstream call

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Uri};
use axum::response::Response;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::TimeoutConfig;
use crate::http::headers::end_to_end;
use crate::http::request::carries_body;
use crate::http::response::ForwardError;

/// Sends requests to upstream origins. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    upstream_timeout: Option<Duration>,
}

impl Forwarder {
    /// Build a forwarder with its own pooled HTTP/HTTPS client.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, rustls::Error> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);

        let upstream_timeout = match timeouts.upstream_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            client,
            upstream_timeout,
        })
    }

    /// Forward `request` to `target` and return the upstream response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: &str,
    ) -> Result<Response, ForwardError> {
        let uri = parse_target(target)?;

        let (parts, body) = request.into_parts();

        let mut headers = end_to_end(&parts.headers);
        // The client sets Host (or :authority) from the target URI.
        headers.remove(header::HOST);

        let body = if carries_body(&parts.method) {
            body
        } else {
            headers.remove(header::CONTENT_LENGTH);
            Body::empty()
        };

        let mut outbound = Request::new(body);
        *outbound.method_mut() = parts.method;
        *outbound.uri_mut() = uri;
        *outbound.headers_mut() = headers;

        let send = self.client.request(outbound);
        let upstream = match self.upstream_timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| ForwardError::Timeout(limit))??,
            None => send.await?,
        };

        let (mut parts, body) = upstream.into_parts();
        parts.headers = end_to_end(&parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Parse a rewritten target; it must be absolute (scheme and authority).
fn parse_target(target: &str) -> Result<Uri, ForwardError> {
    let invalid = || ForwardError::InvalidTarget(target.to_string());
    let uri: Uri = target.parse().map_err(|_| invalid())?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(invalid());
    }
    Ok(uri)
}
