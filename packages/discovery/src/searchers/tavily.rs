//! Tavily search API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DiscoveryError, Result};
use crate::security::SecretString;
use crate::traits::searcher::WebSearcher;
use crate::types::source::SearchHit;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Tavily search depth
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum SearchDepth {
    Basic,
}

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
    include_domains: &'a [String],
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// Individual search result from Tavily
#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        SearchHit::new(r.title, r.url, r.content)
    }
}

/// Domain-restricted web search via Tavily.
pub struct TavilyWebSearcher {
    api_key: SecretString,
    client: reqwest::Client,
    endpoint: String,
}

impl TavilyWebSearcher {
    pub fn new(api_key: SecretString) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DiscoveryError::search)?;

        Ok(Self {
            api_key,
            client,
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }

    /// Override the endpoint (proxies, local fakes).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearcher for TavilyWebSearcher {
    async fn search(
        &self,
        query: &str,
        domains: &[String],
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        let request = TavilyRequest {
            api_key: self.api_key.expose(),
            query,
            search_depth: SearchDepth::Basic,
            max_results,
            include_domains: domains,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Tavily search request failed");
                DiscoveryError::search(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Tavily API error");
            return Err(DiscoveryError::SearchUnavailable(
                format!("Tavily API error {}: {}", status, body).into(),
            ));
        }

        let tavily_response: TavilyResponse =
            response.json().await.map_err(DiscoveryError::search)?;

        debug!(query, results = tavily_response.results.len(), "Tavily search");

        Ok(tavily_response
            .results
            .into_iter()
            .map(SearchHit::from)
            .collect())
    }
}
