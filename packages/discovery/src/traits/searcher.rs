//! Web searcher trait for domain-restricted discovery.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::source::SearchHit;

/// Web search restricted to an allow-list of domains.
///
/// # Implementations
///
/// - `TavilyWebSearcher` - Tavily API
/// - `MockWebSearcher` - For testing
///
/// The pipeline drops hits outside `domains` and truncates to `max_results`
/// regardless of what the implementation returns.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search for pages matching the query on the given domains only.
    async fn search(
        &self,
        query: &str,
        domains: &[String],
        max_results: usize,
    ) -> Result<Vec<SearchHit>>;
}
