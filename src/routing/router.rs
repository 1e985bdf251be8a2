//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan in table order (route tables are tiny)
//! - Explicit no-match rather than silent default

use crate::config::RouteConfig;
use crate::routing::matcher::PrefixMatcher;

/// A compiled route: prefix matcher plus upstream origin.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub matcher: PrefixMatcher,
    pub upstream: String,
}

impl Route {
    pub fn from_config(config: &RouteConfig) -> Self {
        Self {
            name: config.name.clone(),
            matcher: PrefixMatcher::new(config.prefix.clone()),
            upstream: config.upstream.clone(),
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Request path with the route label removed.
    pub path: &'a str,
}

/// Ordered route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile the route table, preserving configuration order.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let routes: Vec<Route> = routes.iter().map(Route::from_config).collect();

        tracing::info!(count = routes.len(), "Route table compiled");
        for route in &routes {
            tracing::debug!(
                route = %route.name,
                prefix = %route.matcher.prefix(),
                upstream = %route.upstream,
                "Route registered"
            );
        }

        Self { routes }
    }

    /// Find the first route whose prefix matches `path`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes.iter().find_map(|route| {
            route
                .matcher
                .strip(path)
                .map(|stripped| RouteMatch {
                    route,
                    path: stripped,
                })
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
