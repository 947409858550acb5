//! Accepted restaurant records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// Fields written when a candidate is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRestaurant {
    pub name: String,
    pub neighborhood: String,
    pub taste_rating: i32,
    pub notes: String,
}

impl NewRestaurant {
    /// Normalize a candidate for storage: trimmed name, taste clamped to 1..=10.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.trim().to_string(),
            neighborhood: candidate.neighborhood.trim().to_string(),
            taste_rating: candidate.taste_rating.clamp(1, 10),
            notes: candidate.notes.trim().to_string(),
        }
    }
}

/// A restaurant owned by the candidate store. Never updated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRestaurant {
    pub id: i64,
    pub name: String,
    pub neighborhood: String,
    pub taste_rating: i32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T = ()> {
    /// Row was written
    Inserted(T),
    /// Key already present; nothing was changed
    Duplicate,
}

impl<T> InsertOutcome<T> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
