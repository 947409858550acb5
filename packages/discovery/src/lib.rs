//! Restaurant Discovery Library
//!
//! Finds restaurants serving a food item near a locality by searching a
//! curated set of trusted sites, asking a language model to pull structured
//! candidates out of the results, and remembering the confident ones.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use discovery::{DiscoveryConfig, DiscoveryPipeline, MemoryStore, PipelineDeps, Target};
//! use discovery::testing::{MockAI, MockWebSearcher, RecordingSleeper};
//!
//! let store = Arc::new(MemoryStore::new());
//! let deps = PipelineDeps {
//!     searcher: Arc::new(MockWebSearcher::new()),
//!     ai: Arc::new(MockAI::new()),
//!     store: store.clone(),
//!     sources: store,
//!     sleeper: Arc::new(RecordingSleeper::new()),
//! };
//! let config = DiscoveryConfig::builder()
//!     .search_api_key("tvly-...")
//!     .llm_api_key("sk-...")
//!     .build();
//!
//! let result = DiscoveryPipeline::new(config, deps)
//!     .run(&Target::new("Pizza", "Markham"))
//!     .await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Provider and storage abstractions (AI, WebSearcher, stores)
//! - [`types`] - Targets, candidates, sources and run results
//! - [`pipeline`] - Search, extract, verify and persist stages
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore)
//! - [`searchers`] - Web search implementations (TavilyWebSearcher)
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod pipeline;
pub mod retry;
pub mod searchers;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use config::DiscoveryConfig;
pub use error::{DiscoveryError, ErrorKind, Result};
pub use retry::{retry_rate_limited, RetryPolicy};
pub use security::SecretString;
pub use traits::{
    ai::AI,
    searcher::WebSearcher,
    sleeper::{Sleeper, TokioSleeper},
    store::{CandidateStore, SourceRegistry, WatchlistStore},
};
pub use types::{
    candidate::{Candidate, CONFIDENCE_THRESHOLD},
    restaurant::{InsertOutcome, NewRestaurant, PersistedRestaurant},
    run::{CandidateFate, PersistFailure, RunResult},
    source::{DomainAllowList, SearchHit, Source, FALLBACK_DOMAINS},
    target::{Target, WatchlistEntry},
};

pub use pipeline::{DiscoveryPipeline, PipelineDeps};

// Re-export stores
pub use stores::{seed_sources, MemoryStore, DEFAULT_SOURCES};
#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

pub use searchers::TavilyWebSearcher;
