//! Query construction, domain-restricted search and context assembly.

use tracing::{debug, info};

use crate::error::Result;
use crate::traits::searcher::WebSearcher;
use crate::types::source::{DomainAllowList, SearchHit};
use crate::types::target::Target;

/// Deterministic search query for a target.
pub fn build_query(target: &Target) -> String {
    format!(
        "best {} in {} area and nearby",
        target.subject, target.locality
    )
}

/// Search, then enforce the allow-list and result bound on whatever the
/// provider returned.
pub async fn search_hits(
    searcher: &dyn WebSearcher,
    query: &str,
    allow_list: &DomainAllowList,
    max_results: usize,
) -> Result<Vec<SearchHit>> {
    let raw = searcher
        .search(query, allow_list.domains(), max_results)
        .await?;
    let returned = raw.len();

    let hits: Vec<SearchHit> = raw
        .into_iter()
        .filter(|hit| {
            let permitted = allow_list.permits(&hit.url);
            if !permitted {
                debug!(url = %hit.url, "Dropping hit outside allow-list");
            }
            permitted
        })
        .take(max_results)
        .collect();

    info!(query, returned, kept = hits.len(), "Search returned results");
    Ok(hits)
}

/// Render hits into one block of text for the extraction prompt.
pub fn assemble_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("Source: {}\nContent: {}", hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockWebSearcher;

    #[test]
    fn query_is_deterministic() {
        let target = Target::new("Dim Sum", "Richmond Hill");
        assert_eq!(
            build_query(&target),
            "best Dim Sum in Richmond Hill area and nearby"
        );
        assert_eq!(build_query(&target), build_query(&target.clone()));
    }

    #[test]
    fn context_keeps_provider_order() {
        let hits = vec![
            SearchHit::new("Pizza Guide", "https://blogto.com/a", "Pizza Nova is the best."),
            SearchHit::new("Reddit thread", "https://reddit.com/b", "Try Blaze."),
        ];
        assert_eq!(
            assemble_context(&hits),
            "Source: Pizza Guide\nContent: Pizza Nova is the best.\nSource: Reddit thread\nContent: Try Blaze."
        );
    }

    #[tokio::test]
    async fn off_list_hits_are_dropped_and_bounded() {
        let searcher = MockWebSearcher::new().with_hits(vec![
            SearchHit::new("a", "https://spam.example/1", "x"),
            SearchHit::new("b", "https://www.reddit.com/r/1", "x"),
            SearchHit::new("c", "https://reddit.com/r/2", "x"),
            SearchHit::new("d", "https://reddit.com/r/3", "x"),
        ]);
        let allow_list = DomainAllowList::from_domains(["reddit.com"]);

        let hits = search_hits(&searcher, "q", &allow_list, 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.url.contains("reddit.com")));
        assert_eq!(searcher.calls()[0].domains, vec!["reddit.com".to_string()]);
        assert_eq!(searcher.calls()[0].max_results, 2);
    }
}
