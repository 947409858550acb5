//! Integration tests for the discovery pipeline.
//!
//! These run the whole search → extract → filter → verify → persist flow
//! against mock providers and real stores.

use std::sync::Arc;
use std::time::Duration;

use discovery::{
    testing::{MockAI, MockWebSearcher, RecordingSleeper},
    CandidateStore, DiscoveryConfig, DiscoveryPipeline, ErrorKind, MemoryStore, PipelineDeps,
    SearchHit, Source, SourceRegistry, SqliteStore, Target, FALLBACK_DOMAINS,
};

const PIZZA_NOVA: &str = r#"```json
[
  {"name": "Pizza Nova", "neighborhood": "Markham", "taste_rating": 8, "notes": "Classic slice", "confidence_score": 9},
  {"name": "Maybe Pizza", "neighborhood": "Markham", "taste_rating": 6, "notes": "One vague mention", "confidence_score": 2}
]
```"#;

struct Harness {
    searcher: Arc<MockWebSearcher>,
    ai: Arc<MockAI>,
    sleeper: Arc<RecordingSleeper>,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new(searcher: MockWebSearcher, ai: MockAI) -> Self {
        Self {
            searcher: Arc::new(searcher),
            ai: Arc::new(ai),
            sleeper: Arc::new(RecordingSleeper::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn deps(&self) -> PipelineDeps {
        PipelineDeps {
            searcher: self.searcher.clone(),
            ai: self.ai.clone(),
            store: self.store.clone(),
            sources: self.store.clone(),
            sleeper: self.sleeper.clone(),
        }
    }

    fn pipeline(&self, config: DiscoveryConfig) -> DiscoveryPipeline {
        DiscoveryPipeline::new(config, self.deps())
    }
}

fn config() -> DiscoveryConfig {
    DiscoveryConfig::builder()
        .search_api_key("tvly-test")
        .llm_api_key("sk-test")
        .build()
}

fn config_without_verification() -> DiscoveryConfig {
    DiscoveryConfig::builder()
        .search_api_key("tvly-test")
        .llm_api_key("sk-test")
        .verify_open_status(false)
        .build()
}

fn pizza_hits() -> Vec<SearchHit> {
    vec![SearchHit::new(
        "Best pizza in Markham",
        "https://www.blogto.com/eat_drink/best-pizza-markham",
        "Pizza Nova on Highway 7 is the best.",
    )]
}

fn target() -> Target {
    Target::new("Pizza", "Markham")
}

#[tokio::test]
async fn test_confident_candidate_is_persisted() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response(PIZZA_NOVA).with_response("OPEN"),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert!(result.is_ok());
    assert_eq!(result.query, "best Pizza in Markham area and nearby");
    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.accepted[0].name, "Pizza Nova");
    assert_eq!(result.accepted[0].taste_rating, 8);
    assert_eq!(result.rejected_count, 1);

    let stored = harness.store.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].neighborhood, "Markham");

    // One discovery search plus one verification search for the survivor
    let calls = harness.searcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].max_results, 5);
    assert_eq!(calls[1].query, "\"Pizza Nova\" Markham permanently closed");
    assert_eq!(calls[1].max_results, 3);
}

#[tokio::test]
async fn test_empty_registry_uses_fallback_domains() {
    let harness = Harness::new(MockWebSearcher::new(), MockAI::new());

    harness.pipeline(config()).run(&target()).await;

    let expected: Vec<String> = FALLBACK_DOMAINS.iter().map(|d| d.to_string()).collect();
    assert_eq!(harness.searcher.calls()[0].domains, expected);
}

#[tokio::test]
async fn test_registry_domains_restrict_search() {
    let harness = Harness::new(MockWebSearcher::new(), MockAI::new());
    harness
        .store
        .add_source(&Source::new("blogto.com", "Local Toronto coverage"))
        .await
        .unwrap();

    harness.pipeline(config()).run(&target()).await;

    assert_eq!(harness.searcher.calls()[0].domains, vec!["blogto.com".to_string()]);
}

#[tokio::test]
async fn test_missing_credentials_make_no_calls() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response(PIZZA_NOVA),
    );
    let config = DiscoveryConfig::builder().llm_api_key("sk-test").build();

    let result = harness.pipeline(config).run(&target()).await;

    assert_eq!(result.error, Some(ErrorKind::ConfigMissing));
    assert!(harness.searcher.calls().is_empty());
    assert!(harness.ai.prompts().is_empty());
    assert_eq!(harness.store.restaurant_count(), 0);
}

#[tokio::test]
async fn test_second_run_only_finds_duplicates() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new()
            .with_response(PIZZA_NOVA)
            .with_response(PIZZA_NOVA),
    );
    let pipeline = harness.pipeline(config_without_verification());

    let first = pipeline.run(&target()).await;
    let second = pipeline.run(&target()).await;

    assert_eq!(first.accepted.len(), 1);
    assert!(second.accepted.is_empty());
    assert_eq!(second.duplicates, vec!["Pizza Nova".to_string()]);
    assert_eq!(harness.store.restaurant_count(), 1);
}

#[tokio::test]
async fn test_low_confidence_is_never_persisted() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response(
            r#"[{"name": "Rumour Slice", "taste_rating": 9, "confidence_score": 4}, {"name": "  ", "confidence_score": 10}]"#,
        ),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert!(result.is_ok());
    assert!(result.accepted.is_empty());
    assert_eq!(result.rejected_count, 2);
    assert_eq!(harness.store.restaurant_count(), 0);
    // No survivors means no verification
    assert_eq!(harness.searcher.calls().len(), 1);
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts_retries() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new()
            .with_rate_limit()
            .with_rate_limit()
            .with_rate_limit(),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert_eq!(result.error, Some(ErrorKind::ExtractionExhausted));
    assert!(result.accepted.is_empty());
    assert_eq!(harness.ai.prompts().len(), 3);
    assert_eq!(
        harness.sleeper.delays(),
        vec![Duration::from_secs(60), Duration::from_secs(60)]
    );
    assert_eq!(harness.store.restaurant_count(), 0);
}

#[tokio::test]
async fn test_search_failure_aborts_before_extraction() {
    let harness = Harness::new(MockWebSearcher::new().failing(), MockAI::new());

    let result = harness.pipeline(config()).run(&target()).await;

    assert_eq!(result.error, Some(ErrorKind::SearchUnavailable));
    assert!(harness.ai.prompts().is_empty());
}

#[tokio::test]
async fn test_no_hits_is_an_empty_success() {
    let harness = Harness::new(MockWebSearcher::new(), MockAI::new());

    let result = harness.pipeline(config()).run(&target()).await;

    assert!(result.is_ok());
    assert!(result.accepted.is_empty());
    assert!(harness.ai.prompts().is_empty());
}

#[tokio::test]
async fn test_unparseable_extraction_persists_nothing() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response("Here are some great pizza places!"),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert_eq!(result.error, Some(ErrorKind::ExtractionParseError));
    assert_eq!(harness.store.restaurant_count(), 0);
}

#[tokio::test]
async fn test_closed_verdict_excludes_candidate() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response(PIZZA_NOVA).with_response("CLOSED"),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert!(result.is_ok());
    assert!(result.accepted.is_empty());
    assert_eq!(result.closed, vec!["Pizza Nova".to_string()]);
    assert_eq!(harness.store.restaurant_count(), 0);
}

#[tokio::test]
async fn test_verification_failure_keeps_candidate() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new()
            .with_response(PIZZA_NOVA)
            .with_failure("503 service unavailable"),
    );

    let result = harness.pipeline(config()).run(&target()).await;

    assert!(result.is_ok());
    assert_eq!(result.accepted.len(), 1);
    assert!(result.closed.is_empty());
}

#[tokio::test]
async fn test_disabled_verification_skips_second_search() {
    let harness = Harness::new(
        MockWebSearcher::new().with_hits(pizza_hits()),
        MockAI::new().with_response(PIZZA_NOVA),
    );

    let result = harness.pipeline(config_without_verification()).run(&target()).await;

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(harness.searcher.calls().len(), 1);
    assert_eq!(harness.ai.prompts().len(), 1);
}

#[tokio::test]
async fn test_sqlite_store_end_to_end() {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    let searcher = Arc::new(MockWebSearcher::new().with_hits(pizza_hits()));
    let ai = Arc::new(
        MockAI::new()
            .with_response(PIZZA_NOVA)
            .with_response(PIZZA_NOVA),
    );
    let deps = PipelineDeps {
        searcher: searcher.clone(),
        ai: ai.clone(),
        store: store.clone(),
        sources: store.clone(),
        sleeper: Arc::new(RecordingSleeper::new()),
    };
    let pipeline = DiscoveryPipeline::new(config_without_verification(), deps);

    let first = pipeline.run(&target()).await;
    let second = pipeline.run(&target()).await;

    assert_eq!(first.accepted.len(), 1);
    assert_eq!(second.duplicates.len(), 1);

    let stored = store.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Pizza Nova");
    assert_eq!(stored[0].notes, "Classic slice");
}
