//! Request path decomposition.

use serde::{Deserialize, Serialize};

/// The current request path, decomposed into non-empty segments.
///
/// `/products/new/1/` becomes `["products", "new", "1"]`. The first
/// segment is the page identifier, used both for plugin route activation
/// and as the redirect target check for the not-found fallback.
/// Decomposition is pure: the same raw path always yields the same
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePath {
    segments: Vec<String>,
}

impl RoutePath {
    /// Parse a raw request path into segments.
    ///
    /// Leading/trailing slashes are trimmed first, then the remainder is
    /// split on `/`. Empty segments (from doubled slashes) are dropped.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// The page identifier: segment 0, or `""` when the path is empty.
    pub fn page_id(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Segment at `index`, if present.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}
