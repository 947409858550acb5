//! Storage traits.
//!
//! - `CandidateStore` - accepted restaurants, unique by name
//! - `WatchlistStore` - targets the scheduler scans
//! - `SourceRegistry` - trusted search domains

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{
    restaurant::{InsertOutcome, NewRestaurant, PersistedRestaurant},
    source::Source,
    target::WatchlistEntry,
};

/// Persisted set of accepted restaurants.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Insert unless a record with the same name exists.
    ///
    /// Must be a single atomic conditional insert so concurrent pipelines
    /// cannot both write the same name. An existing record is never
    /// modified.
    async fn insert_if_absent(
        &self,
        record: &NewRestaurant,
    ) -> Result<InsertOutcome<PersistedRestaurant>>;

    /// All records, most recently inserted first.
    async fn list_all(&self) -> Result<Vec<PersistedRestaurant>>;
}

/// Ordered set of (subject, locality) targets.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Targets in insertion order.
    async fn list_targets(&self) -> Result<Vec<WatchlistEntry>>;

    /// Add a target. Subjects are unique.
    async fn add_target(&self, subject: &str, locality: &str) -> Result<InsertOutcome>;

    /// Record when a subject was last scanned.
    async fn mark_checked(&self, subject: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Domain allow-list source for searches.
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    async fn list_sources(&self) -> Result<Vec<Source>>;

    /// Register a domain. Domains are unique.
    async fn add_source(&self, source: &Source) -> Result<InsertOutcome>;
}
