//! Testing utilities including mock implementations.
//!
//! These let applications exercise the discovery pipeline without network
//! calls, model calls or real delays.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{DiscoveryError, Result};
use crate::traits::{ai::AI, searcher::WebSearcher, sleeper::Sleeper};
use crate::types::source::SearchHit;

/// Record of a call made to the mock searcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub domains: Vec<String>,
    pub max_results: usize,
}

/// A mock web searcher returning the same canned hits for every query.
#[derive(Default)]
pub struct MockWebSearcher {
    hits: Vec<SearchHit>,
    fail: bool,
    calls: Arc<RwLock<Vec<SearchCall>>>,
}

impl MockWebSearcher {
    /// Create a searcher that finds nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these hits for every search.
    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Fail every search with `SearchUnavailable`.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search(
        &self,
        query: &str,
        domains: &[String],
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.calls.write().unwrap().push(SearchCall {
            query: query.to_string(),
            domains: domains.to_vec(),
            max_results,
        });

        if self.fail {
            return Err(DiscoveryError::SearchUnavailable(
                "mock search provider unavailable".into(),
            ));
        }
        Ok(self.hits.clone())
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    RateLimited,
    Failure(String),
}

/// A mock model that answers prompts from a queue.
///
/// Each call consumes the next queued reply. Once the queue is empty every
/// call returns `[]`, which reads as "no candidates" to extraction and as an
/// uncertain verdict to verification.
#[derive(Default)]
pub struct MockAI {
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()))
    }

    /// Queue a quota rejection.
    pub fn with_rate_limit(self) -> Self {
        self.push(MockReply::RateLimited)
    }

    /// Queue a non-quota provider failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Failure(message.into()))
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies.write().unwrap().push_back(reply);
        self
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl AI for MockAI {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.write().unwrap().push(prompt.to_string());

        let reply = self.replies.write().unwrap().pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::RateLimited) => {
                Err(DiscoveryError::RateLimited("429 RESOURCE_EXHAUSTED".into()))
            }
            Some(MockReply::Failure(message)) => Err(DiscoveryError::AI(message.into())),
            None => Ok("[]".to_string()),
        }
    }
}

/// A sleeper that records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.read().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.write().unwrap().push(duration);
    }
}
