//! End-to-end tests: client → relay → local echo upstream.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;

mod common;

async fn echoed(res: reqwest::Response) -> Value {
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-upstream"], "echo");
    let body = res.bytes().await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn header_names(echo: &Value) -> Vec<&str> {
    let mut names: Vec<&str> = echo["headers"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    names
}

#[tokio::test]
async fn test_get_rewrites_target_and_drops_body() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .get(format!(
            "http://{}/groq/openai/v1/chat/completions?x=1",
            relay
        ))
        .header("authorization", "Bearer ABC")
        .body("ignored")
        .send()
        .await
        .unwrap();

    let echo = echoed(res).await;
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["uri"], "/openai/v1/chat/completions?x=1");
    assert_eq!(echo["headers"]["authorization"][0], "Bearer ABC");
    assert_eq!(echo["headers"]["host"][0], upstream.to_string());
    assert!(echo["headers"].get("content-length").is_none());
    assert_eq!(echo["body"], "");

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_forwards_body_and_credentials() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .post(format!("http://{}/anthropic/v1/messages", relay))
        .header("x-api-key", "K")
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .body(r#"{"model":"claude"}"#)
        .send()
        .await
        .unwrap();

    let echo = echoed(res).await;
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["uri"], "/v1/messages");
    assert_eq!(echo["body"], r#"{"model":"claude"}"#);
    assert_eq!(echo["headers"]["x-api-key"][0], "K");
    assert_eq!(echo["headers"]["anthropic-version"][0], "2023-06-01");
    assert_eq!(echo["headers"]["content-type"][0], "application/json");

    shutdown.trigger();
}

#[tokio::test]
async fn test_other_methods_keep_body() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::client();

    for method in [reqwest::Method::PUT, reqwest::Method::PATCH, reqwest::Method::DELETE] {
        let res = client
            .request(method.clone(), format!("http://{}/openai/v1/files/abc", relay))
            .body("payload")
            .send()
            .await
            .unwrap();

        let echo = echoed(res).await;
        assert_eq!(echo["method"], method.as_str());
        assert_eq!(echo["body"], "payload");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_large_body_streams_through() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let body = "x".repeat(4 * 1024 * 1024);
    let res = common::client()
        .post(format!("http://{}/openai/v1/uploads", relay))
        .body(body.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-echo-body-len"], body.len().to_string().as_str());
    let echo = echoed(res).await;
    assert_eq!(echo["body"].as_str().unwrap().len(), body.len());

    shutdown.trigger();
}

#[tokio::test]
async fn test_head_has_no_body() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .head(format!("http://{}/openai/v1/models", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-echo-body-len"], "0");

    shutdown.trigger();
}

#[tokio::test]
async fn test_path_and_query_are_byte_identical() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .get(format!(
            "http://{}/openai//v1/models%2Fgpt-4o:generate?key=a%20b&alt=sse&empty=",
            relay
        ))
        .send()
        .await
        .unwrap();

    let echo = echoed(res).await;
    assert_eq!(echo["uri"], "//v1/models%2Fgpt-4o:generate?key=a%20b&alt=sse&empty=");

    shutdown.trigger();
}

#[tokio::test]
async fn test_raw_targets_reach_upstream_verbatim() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    for (sent, expected) in [
        ("/openai/v1/files/{id}?q='abc'", "/v1/files/{id}?q='abc'"),
        ("/openai/%2e%2e/secret?x=1", "/%2e%2e/secret?x=1"),
        ("/openai/./v1/../models", "/./v1/../models"),
        ("/groq/v1/models?", "/v1/models?"),
    ] {
        let response = common::send_raw(
            relay,
            &format!("GET {sent} HTTP/1.1\r\nHost: relay.test\r\nConnection: close\r\n\r\n"),
        )
        .await;

        let echo = common::raw_echo(&response);
        assert_eq!(echo["uri"], expected, "{sent}");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_no_headers_are_invented() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let response = common::send_raw(
        relay,
        "GET /openai/v1/models HTTP/1.1\r\n\
         Host: relay.test\r\n\
         Authorization: Bearer ABC\r\n\
         X-Request-Id: req-9\r\n\
         Connection: close\r\n\r\n",
    )
    .await;

    let echo = common::raw_echo(&response);
    assert_eq!(header_names(&echo), ["authorization", "host", "x-request-id"]);
    assert_eq!(echo["headers"]["host"][0], upstream.to_string());
    assert_eq!(echo["headers"]["x-request-id"][0], "req-9");

    // Without a caller id the relay generates one; nothing else is added.
    let response = common::send_raw(
        relay,
        "GET /openai/v1/models HTTP/1.1\r\nHost: relay.test\r\nConnection: close\r\n\r\n",
    )
    .await;

    let echo = common::raw_echo(&response);
    assert_eq!(header_names(&echo), ["host", "x-request-id"]);
    assert_eq!(echo["headers"]["x-request-id"][0].as_str().unwrap().len(), 36);

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirect_is_returned_not_followed() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/openai/moved", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "https://elsewhere.example.com/new");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_route() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::client();

    for path in ["/openai", "/openaiFoo/v1", "/deepseek/v1/chat/completions"] {
        let res = client
            .post(format!("http://{}{}", relay, path))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(res.text().await.unwrap(), "Unknown route");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_usage_page() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert!(res.headers().contains_key("x-request-id"));

    let page = res.text().await.unwrap();
    assert!(page.contains(&format!("https://{}/openai", relay)));
    assert!(page.contains(&format!("https://{}/anthropic/v1/messages", relay)));

    let res = common::client()
        .get(format!("http://{}/", relay))
        .header("x-forwarded-proto", "http")
        .header("host", "relay.example.com")
        .send()
        .await
        .unwrap();
    let page = res.text().await.unwrap();
    assert!(page.contains("<pre>http://relay.example.com</pre>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let upstream = common::start_echo_upstream().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::client()
        .post(format!("http://{}/dead/v1/chat/completions", relay))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await.unwrap(), "Upstream request failed");

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_is_gateway_timeout() {
    let upstream = common::start_echo_upstream().await;
    let mut config = common::relay_config(upstream);
    config.timeouts.upstream_secs = 1;
    let (relay, shutdown) = common::start_relay(config).await;

    let res = common::client()
        .get(format!("http://{}/openai/slow", relay))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);

    shutdown.trigger();
}
