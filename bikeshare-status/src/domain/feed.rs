//! Feed discovery entries.

use std::fmt;

/// One feed advertised by a system's auto-discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedInfo {
    /// Feed name, e.g. `station_status`.
    pub name: String,
    pub url: String,
}

impl fmt::Display for FeedInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.url)
    }
}
