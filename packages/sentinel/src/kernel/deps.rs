//! Sentinel dependencies (using traits for testability)
//!
//! Production wiring is Tavily for search, an OpenAI-compatible model for
//! extraction and verification, and one SQLite file for every store.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use discovery::{
    ai::OpenAI, CandidateStore, DiscoveryError, PipelineDeps, Sleeper, SourceRegistry, SqliteStore,
    TavilyWebSearcher, TokioSleeper, WatchlistStore, WebSearcher, AI,
};

use crate::config::Config;

/// Everything a batch needs, behind trait objects.
#[derive(Clone)]
pub struct SentinelDeps {
    pub searcher: Arc<dyn WebSearcher>,
    pub ai: Arc<dyn AI>,
    pub candidates: Arc<dyn CandidateStore>,
    pub watchlist: Arc<dyn WatchlistStore>,
    pub sources: Arc<dyn SourceRegistry>,
    pub sleeper: Arc<dyn Sleeper>,
}

impl SentinelDeps {
    /// Build production dependencies.
    ///
    /// Fails with `ConfigMissing` before any provider is constructed when a
    /// credential is absent.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tavily_key = config
            .tavily_api_key
            .clone()
            .ok_or(DiscoveryError::ConfigMissing {
                name: "TAVILY_API_KEY",
            })?;
        let openai_key = config
            .openai_api_key
            .as_ref()
            .ok_or(DiscoveryError::ConfigMissing {
                name: "OPENAI_API_KEY",
            })?;

        let store = open_store(config).await?;

        let searcher = TavilyWebSearcher::new(tavily_key)
            .context("Failed to create Tavily client")?;

        let mut ai = OpenAI::from_secret(openai_key).with_model(&config.model);
        if let Some(base_url) = &config.openai_base_url {
            ai = ai.with_base_url(base_url);
        }

        info!(model = %ai.model(), db_path = %config.db_path, "Providers configured");

        Ok(Self {
            searcher: Arc::new(searcher),
            ai: Arc::new(ai),
            candidates: store.clone(),
            watchlist: store.clone(),
            sources: store,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// The subset the discovery pipeline talks to.
    pub fn pipeline_deps(&self) -> PipelineDeps {
        PipelineDeps {
            searcher: self.searcher.clone(),
            ai: self.ai.clone(),
            store: self.candidates.clone(),
            sources: self.sources.clone(),
            sleeper: self.sleeper.clone(),
        }
    }
}

/// Open the configured SQLite file, creating it and its tables if needed.
pub async fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path))?;
    Ok(Arc::new(store))
}
