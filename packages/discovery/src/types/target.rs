//! What to look for and where.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (subject, locality) pair investigated in a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Food item, e.g. "Dim Sum"
    pub subject: String,
    /// Area to search around, e.g. "Richmond Hill"
    pub locality: String,
}

impl Target {
    pub fn new(subject: impl Into<String>, locality: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            locality: locality.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}", self.subject, self.locality)
    }
}

/// A persisted watchlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub subject: String,
    pub locality: String,
    pub last_checked: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    pub fn target(&self) -> Target {
        Target::new(self.subject.clone(), self.locality.clone())
    }
}
