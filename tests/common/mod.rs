//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use ai_relay::config::{ProxyConfig, RouteConfig};
use ai_relay::{HttpServer, Shutdown};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start an upstream that describes every request it receives as JSON.
///
/// - `/moved` answers `302` with a `Location` header
/// - `/slow` waits three seconds before answering
/// - every response carries `x-upstream: echo` and `x-echo-body-len`
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(echo);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

async fn echo(request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    match parts.uri.path() {
        "/moved" => {
            return (
                StatusCode::FOUND,
                [(header::LOCATION, "https://elsewhere.example.com/new")],
                "",
            )
                .into_response();
        }
        "/slow" => tokio::time::sleep(Duration::from_secs(3)).await,
        _ => {}
    }

    let mut headers = Map::new();
    for (name, value) in &parts.headers {
        let values = headers
            .entry(name.as_str())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = values {
            values.push(json!(value.to_str().unwrap()));
        }
    }

    let description = json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::HeaderName::from_static("x-upstream"), "echo".to_string()),
            (
                header::HeaderName::from_static("x-echo-body-len"),
                body.len().to_string(),
            ),
        ],
        description.to_string(),
    )
        .into_response()
}

/// Relay config whose provider routes all point at `upstream`, plus a
/// `/dead/` route to a closed port.
pub fn relay_config(upstream: SocketAddr) -> ProxyConfig {
    let origin = format!("http://{}", upstream);
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes = vec![
        RouteConfig::new("openai", "/openai/", origin.clone()),
        RouteConfig::new("anthropic", "/anthropic/", origin.clone()),
        RouteConfig::new("groq", "/groq/", origin),
        RouteConfig::new("dead", "/dead/", "http://127.0.0.1:1"),
    ];
    config
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never follows redirects and ignores proxy env vars.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Write `head` verbatim to `addr` and read until the server closes.
/// `head` must ask for `Connection: close`.
pub async fn send_raw(addr: SocketAddr, head: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(head.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut response))
        .await
        .unwrap()
        .unwrap();
    String::from_utf8(response).unwrap()
}

/// The echo description inside a raw response, chunked or not.
pub fn raw_echo(response: &str) -> Value {
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    let start = response.find('{').unwrap();
    let end = response.rfind('}').unwrap();
    serde_json::from_str(&response[start..=end]).unwrap()
}
