//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

use crate::error::{DiscoveryError, Result};
use crate::traits::store::{CandidateStore, SourceRegistry, WatchlistStore};
use crate::types::{
    restaurant::{InsertOutcome, NewRestaurant, PersistedRestaurant},
    source::Source,
    target::WatchlistEntry,
};

/// In-memory storage for restaurants, watchlist and sources.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    restaurants: RwLock<Vec<PersistedRestaurant>>,
    watchlist: RwLock<Vec<WatchlistEntry>>,
    sources: RwLock<Vec<Source>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            restaurants: RwLock::new(Vec::new()),
            watchlist: RwLock::new(Vec::new()),
            sources: RwLock::new(Vec::new()),
        }
    }

    /// Get the number of stored restaurants.
    pub fn restaurant_count(&self) -> usize {
        self.restaurants.read().unwrap().len()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn insert_if_absent(
        &self,
        record: &NewRestaurant,
    ) -> Result<InsertOutcome<PersistedRestaurant>> {
        if record.name.is_empty() {
            return Err(DiscoveryError::InvalidInput {
                reason: "restaurant name is empty".into(),
            });
        }

        // Check and insert under one write lock.
        let mut restaurants = self.restaurants.write().unwrap();
        if restaurants.iter().any(|r| r.name == record.name) {
            return Ok(InsertOutcome::Duplicate);
        }

        let saved = PersistedRestaurant {
            id: restaurants.len() as i64 + 1,
            name: record.name.clone(),
            neighborhood: record.neighborhood.clone(),
            taste_rating: record.taste_rating,
            notes: record.notes.clone(),
            created_at: Utc::now(),
        };
        restaurants.push(saved.clone());
        Ok(InsertOutcome::Inserted(saved))
    }

    async fn list_all(&self) -> Result<Vec<PersistedRestaurant>> {
        Ok(self.restaurants.read().unwrap().iter().rev().cloned().collect())
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn list_targets(&self) -> Result<Vec<WatchlistEntry>> {
        Ok(self.watchlist.read().unwrap().clone())
    }

    async fn add_target(&self, subject: &str, locality: &str) -> Result<InsertOutcome> {
        let mut watchlist = self.watchlist.write().unwrap();
        if watchlist.iter().any(|e| e.subject == subject) {
            return Ok(InsertOutcome::Duplicate);
        }
        let id = watchlist.len() as i64 + 1;
        watchlist.push(WatchlistEntry {
            id,
            subject: subject.to_string(),
            locality: locality.to_string(),
            last_checked: None,
        });
        Ok(InsertOutcome::Inserted(()))
    }

    async fn mark_checked(&self, subject: &str, at: DateTime<Utc>) -> Result<()> {
        let mut watchlist = self.watchlist.write().unwrap();
        if let Some(entry) = watchlist.iter_mut().find(|e| e.subject == subject) {
            entry.last_checked = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl SourceRegistry for MemoryStore {
    async fn list_sources(&self) -> Result<Vec<Source>> {
        Ok(self.sources.read().unwrap().clone())
    }

    async fn add_source(&self, source: &Source) -> Result<InsertOutcome> {
        let mut sources = self.sources.write().unwrap();
        if sources.iter().any(|s| s.domain == source.domain) {
            return Ok(InsertOutcome::Duplicate);
        }
        sources.push(source.clone());
        Ok(InsertOutcome::Inserted(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            neighborhood: "Unionville".to_string(),
            taste_rating: 7,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let store = MemoryStore::new();
        store.insert_if_absent(&record("First")).await.unwrap();
        store.insert_if_absent(&record("Second")).await.unwrap();

        let names: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_one_row() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_if_absent(&record("Pizza Nova")).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_inserted() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.restaurant_count(), 1);
    }

    #[tokio::test]
    async fn watchlist_marks_checked() {
        let store = MemoryStore::new();
        assert!(store.add_target("Ramen", "North York").await.unwrap().is_inserted());
        assert_eq!(
            store.add_target("Ramen", "Vaughan").await.unwrap(),
            InsertOutcome::Duplicate
        );

        let now = Utc::now();
        store.mark_checked("Ramen", now).await.unwrap();

        let entries = store.list_targets().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].locality, "North York");
        assert_eq!(entries[0].last_checked, Some(now));
    }
}
