//! Deduplicating persistence of eligible candidates.

use tracing::{info, warn};

use crate::traits::store::CandidateStore;
use crate::types::{
    candidate::Candidate,
    restaurant::{InsertOutcome, NewRestaurant, PersistedRestaurant},
    run::CandidateFate,
};

/// Outcome of persisting one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Inserted(PersistedRestaurant),
    Duplicate,
    Failed(String),
}

impl From<PersistOutcome> for CandidateFate {
    fn from(outcome: PersistOutcome) -> Self {
        match outcome {
            PersistOutcome::Inserted(record) => CandidateFate::Persisted(record),
            PersistOutcome::Duplicate => CandidateFate::DuplicateSkipped,
            PersistOutcome::Failed(reason) => CandidateFate::PersistFailed(reason),
        }
    }
}

/// Insert a candidate unless its name is already stored.
///
/// Uniqueness is left to the store's conditional insert; there is no
/// pre-check here. A store failure affects this candidate only.
pub async fn persist_candidate(store: &dyn CandidateStore, candidate: &Candidate) -> PersistOutcome {
    let record = NewRestaurant::from_candidate(candidate);

    match store.insert_if_absent(&record).await {
        Ok(InsertOutcome::Inserted(saved)) => {
            info!(name = %saved.name, taste_rating = saved.taste_rating, "Saved restaurant");
            PersistOutcome::Inserted(saved)
        }
        Ok(InsertOutcome::Duplicate) => {
            info!(name = %record.name, "Skipping duplicate restaurant");
            PersistOutcome::Duplicate
        }
        Err(e) => {
            warn!(name = %record.name, error = %e, "Failed to save restaurant");
            PersistOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    fn candidate(name: &str, notes: &str) -> Candidate {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "neighborhood": "Markham",
            "taste_rating": 8,
            "notes": notes,
            "confidence_score": 9
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn first_writer_wins() {
        let store = MemoryStore::new();

        let first = persist_candidate(&store, &candidate("Pizza Nova", "Classic slice")).await;
        let second =
            persist_candidate(&store, &candidate("Pizza Nova", "Much richer notes")).await;

        assert!(matches!(first, PersistOutcome::Inserted(_)));
        assert_eq!(second, PersistOutcome::Duplicate);

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes, "Classic slice");
    }
}
