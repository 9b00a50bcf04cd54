//! Forwarding route table.

use crate::routing::matcher::PathPrefixMatcher;

/// Decides whether a request path is forwarded upstream.
///
/// Built once per configuration load and swapped as a whole on reload.
#[derive(Debug, Clone, Default)]
pub struct PathRouter {
    matchers: Vec<PathPrefixMatcher>,
}

impl PathRouter {
    pub fn from_prefixes(prefixes: &[String]) -> Self {
        Self {
            matchers: prefixes.iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// First matching prefix, if any.
    pub fn match_path(&self, path: &str) -> Option<&PathPrefixMatcher> {
        self.matchers.iter().find(|m| m.matches(path))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }
}
