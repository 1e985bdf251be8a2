//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the route table (prefix shape, unique labels, upstream origins)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, RouteConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("timeouts.connect_secs must be greater than zero")]
    ConnectTimeout,

    #[error("route table is empty")]
    NoRoutes,

    #[error("route {route:?}: prefix {prefix:?} must look like \"/<label>/\"")]
    Prefix { route: String, prefix: String },

    #[error("route {route:?}: duplicate prefix {prefix:?}")]
    DuplicatePrefix { route: String, prefix: String },

    #[error("duplicate route name {0:?}")]
    DuplicateName(String),

    #[error("route {route:?}: upstream {upstream:?} {reason}")]
    Upstream {
        route: String,
        upstream: String,
        reason: &'static str,
    },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ConnectTimeout);
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    if routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
        return;
    }

    let mut names = HashSet::new();
    let mut prefixes = HashSet::new();

    for route in routes {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if !is_label_prefix(&route.prefix) {
            errors.push(ValidationError::Prefix {
                route: route.name.clone(),
                prefix: route.prefix.clone(),
            });
        } else if !prefixes.insert(route.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                route: route.name.clone(),
                prefix: route.prefix.clone(),
            });
        }

        if let Err(reason) = check_origin(&route.upstream) {
            errors.push(ValidationError::Upstream {
                route: route.name.clone(),
                upstream: route.upstream.clone(),
                reason,
            });
        }
    }
}

/// `/label/` with a non-empty label and no inner slash.
fn is_label_prefix(prefix: &str) -> bool {
    prefix
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .map(|label| !label.is_empty() && !label.contains('/'))
        .unwrap_or(false)
}

fn check_origin(upstream: &str) -> Result<(), &'static str> {
    if upstream.ends_with('/') {
        return Err("must not end with a slash");
    }
    let url = Url::parse(upstream).map_err(|_| "is not an absolute URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("must use http or https");
    }
    if url.host_str().is_none() {
        return Err("has no host");
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must be an origin without path or query");
    }
    Ok(())
}
