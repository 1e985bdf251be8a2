//! Usage page served at `/`.
//!
//! # Responsibilities
//! - Derive the externally visible origin from forwarding headers
//! - Render an HTML page listing every configured route with example calls
//!
//! # Design Decisions
//! - Rendering is a pure function of the origin and the route table
//! - `x-forwarded-proto` wins over the local scheme, defaulting to https
//!   because the relay normally sits behind a TLS-terminating edge

use axum::http::{header, HeaderMap, Uri};

use crate::routing::Route;

/// Header carrying the scheme seen by the outermost proxy.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Compose `scheme://host` as seen by the client.
pub fn effective_origin(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("https");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

/// Render the usage page for `origin`.
pub fn render_usage(origin: &str, routes: &[Route]) -> String {
    let origin = escape_html(origin);

    let mut sections = String::new();
    for route in routes {
        sections.push_str(&render_route(&origin, route));
    }

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>AI API Reverse Proxy</title>
  <style>
    body {{ font-family: system-ui; max-width: 900px; margin: 40px auto; }}
    pre {{ background: #0f172a; color: #e5e7eb; padding: 16px; }}
    h1 {{ margin-bottom: 0; }}
    small {{ color: #666; }}
  </style>
</head>
<body>

<h1>AI API Reverse Proxy</h1>

<p>Current origin:</p>
<pre>{origin}</pre>
{sections}
<p><small>Requests are forwarded unchanged. Credentials are passed through, never stored.</small></p>

</body>
</html>
"#
    )
}

fn render_route(origin: &str, route: &Route) -> String {
    let label = escape_html(route.matcher.label());
    let upstream = escape_html(&route.upstream);

    let (title, example) = match route.name.as_str() {
        "openai" => (
            "OpenAI".to_string(),
            format!(
                "Base URL:\n{origin}{label}\n\nOfficial SDK:\nclient = OpenAI({{\n  baseURL: \"{origin}{label}\",\n  apiKey: \"YOUR_API_KEY\"\n}})"
            ),
        ),
        "anthropic" => (
            "Anthropic (Claude)".to_string(),
            format!("POST {origin}{label}/v1/messages\nHeader:\nx-api-key: YOUR_API_KEY"),
        ),
        "groq" => (
            "Groq".to_string(),
            format!(
                "POST {origin}{label}/openai/v1/chat/completions\nAuthorization: Bearer YOUR_API_KEY"
            ),
        ),
        "deepseek" => (
            "DeepSeek".to_string(),
            format!("POST {origin}{label}/v1/chat/completions\nAuthorization: Bearer YOUR_API_KEY"),
        ),
        "gemini" => (
            "Gemini".to_string(),
            format!("POST {origin}{label}/v1beta/models/...\n?key=YOUR_API_KEY"),
        ),
        other => (
            escape_html(other),
            format!("Base URL:\n{origin}{label}\n\nForwards to {upstream}"),
        ),
    };

    format!("\n<h2>{title}</h2>\n<pre>\n{example}\n</pre>\n")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
