//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → "/"  → usage.rs (render usage page)
//!     → else → routing layer picks upstream and rewrites the URL
//!              → forward.rs (rebuild request, stream to upstream)
//!              → headers.rs (end-to-end header pass-through)
//!     → response.rs (relay-generated errors only)
//!     → Send to client
//! ```

pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod usage;

pub use forward::Forwarder;
pub use request::X_REQUEST_ID;
pub use response::{ForwardError, UNKNOWN_ROUTE};
pub use server::{HttpServer, ServerError};
