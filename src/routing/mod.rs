//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (literal prefix check, label stripping)
//!     → rewrite.rs (origin + stripped path + query)
//!     → Return: upstream URL, or no match
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile prefix matchers in config order
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by table position)

pub mod matcher;
pub mod rewrite;
pub mod router;

pub use matcher::PrefixMatcher;
pub use rewrite::upstream_url;
pub use router::{Route, RouteMatch, Router};
