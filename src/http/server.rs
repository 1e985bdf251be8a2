//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve the usage page at `/`
//! - Dispatch every other path to the routing table
//! - Forward matched requests to upstream origins

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Uri},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::request::request_id;
use crate::http::response::unknown_route;
use crate::http::usage::{effective_origin, render_usage};
use crate::observability::metrics;
use crate::routing::{upstream_url, Router as ProxyRouter};

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream TLS connector: {0}")]
    Tls(#[from] rustls::Error),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState {
            router: Arc::new(ProxyRouter::from_config(&config.routes)),
            forwarder: Forwarder::new(&config.timeouts)?,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(usage_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered application, e.g. for in-process testing.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Request span carrying the path only; query strings may hold API keys.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
    )
}

/// Usage page at `/`, for any method.
async fn usage_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Html<String> {
    let origin = effective_origin(&headers, &uri);
    Html(render_usage(&origin, state.router.routes()))
}

/// Main proxy handler.
/// Looks up route, rewrites the target and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_owned);

    let Some(matched) = state.router.match_path(&path) else {
        tracing::debug!(request_id = %request_id, path = %path, "No route matched");
        metrics::record_request("none", 404, start_time);
        return unknown_route();
    };

    let route = matched.route.name.as_str();
    let target = upstream_url(&matched.route.upstream, matched.path, query.as_deref());

    // Query strings may carry API keys; only the path is logged.
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = %route,
        upstream = %matched.route.upstream,
        path = %matched.path,
        "Forwarding request"
    );

    match state.forwarder.forward(request, &target).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                route = %route,
                status = status.as_u16(),
                "Upstream responded"
            );
            metrics::record_request(route, status.as_u16(), start_time);
            response
        }
        Err(e) => {
            let status = e.status();
            tracing::warn!(
                request_id = %request_id,
                route = %route,
                status = status.as_u16(),
                error = %e,
                "Upstream error"
            );
            metrics::record_request(route, status.as_u16(), start_time);
            e.into_response()
        }
    }
}
