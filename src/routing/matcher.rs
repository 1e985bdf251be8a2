//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive, literal)
//! - Strip the route label from a matched path
//!
//! # Design Decisions
//! - The prefix includes its trailing slash, so `/openai` and `/openaiFoo/`
//!   never match `/openai/`
//! - Stripping removes the label only; the remainder keeps its leading slash
//! - No regex to guarantee O(n) matching

/// Matches a request path against a literal `/<label>/` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    /// Create a new prefix matcher. The prefix is used verbatim.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The full prefix, e.g. `/openai/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The route label with its leading slash, e.g. `/openai`.
    pub fn label(&self) -> &str {
        self.prefix.strip_suffix('/').unwrap_or(&self.prefix)
    }

    /// Returns true if the path starts with the exact prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Remove the route label from a matching path.
    ///
    /// `/openai/v1/models` becomes `/v1/models`. Returns `None` when the
    /// path does not match.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.matches(path) {
            Some(&path[self.label().len()..])
        } else {
            None
        }
    }
}
