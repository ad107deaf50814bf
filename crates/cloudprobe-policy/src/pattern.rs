//! Test-id patterns.

use std::fmt;

use serde::{Serialize, Serializer};

/// A configured test-id pattern, parsed once at load time.
///
/// A leading `*` makes the rest of the string an unanchored substring match;
/// anything else must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Exact(String),
    Wildcard(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('*') {
            Some(rest) => Pattern::Wildcard(rest.to_string()),
            None => Pattern::Exact(raw.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Wildcard(_))
    }

    pub fn matches(&self, test_id: &str) -> bool {
        match self {
            Pattern::Exact(id) => id == test_id,
            Pattern::Wildcard(needle) => test_id.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Exact(id) => f.write_str(id),
            Pattern::Wildcard(needle) => write!(f, "*{}", needle),
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
