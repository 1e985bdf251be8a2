//! AI API relay library.
//!
//! Path-prefix reverse proxy in front of hosted LLM APIs: `/openai/...`,
//! `/anthropic/...` and friends are forwarded verbatim to the provider's
//! origin, and `/` serves a usage page.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
