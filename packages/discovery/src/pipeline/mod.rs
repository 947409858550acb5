//! The discovery pipeline.
//!
//! Pipeline, per target:
//! 1. Build the query from the target
//! 2. Search the registry's domains (fallback set if empty)
//! 3. Assemble hits into one context block
//! 4. Extract candidates, retrying rate limits with a cooldown
//! 5. Drop candidates below the confidence threshold
//! 6. Verify survivors are not permanently closed (optional)
//! 7. Insert into the candidate store; duplicates are skipped
//!
//! Any stage failure aborts this target only and is reported on the
//! [`RunResult`], never raised.

pub mod extract;
pub mod persist;
pub mod prompts;
pub mod search;
pub mod verify;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DiscoveryConfig;
use crate::error::ErrorKind;
use crate::traits::{
    ai::AI,
    searcher::WebSearcher,
    sleeper::Sleeper,
    store::{CandidateStore, SourceRegistry},
};
use crate::types::{
    candidate::Candidate,
    run::{CandidateFate, RunResult},
    source::DomainAllowList,
    target::Target,
};

pub use extract::{extract_candidates, parse_candidates, strip_code_fence};
pub use persist::{persist_candidate, PersistOutcome};
pub use search::{assemble_context, build_query, search_hits};
pub use verify::{verify_open_status, OpenStatus, Verdict, DEFAULT_ON_UNCERTAINTY};

/// Providers and stores the pipeline talks to.
#[derive(Clone)]
pub struct PipelineDeps {
    pub searcher: Arc<dyn WebSearcher>,
    pub ai: Arc<dyn AI>,
    pub store: Arc<dyn CandidateStore>,
    pub sources: Arc<dyn SourceRegistry>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Runs search → extract → filter → verify → persist for one target.
#[derive(Clone)]
pub struct DiscoveryPipeline {
    config: DiscoveryConfig,
    deps: PipelineDeps,
}

impl DiscoveryPipeline {
    pub fn new(config: DiscoveryConfig, deps: PipelineDeps) -> Self {
        Self { config, deps }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run the full pipeline for one target.
    pub async fn run(&self, target: &Target) -> RunResult {
        let query = build_query(target);

        if let Err(e) = self.config.ensure_credentials() {
            warn!(target = %target, error = %e, "Credentials missing, skipping discovery");
            return RunResult::aborted(target.clone(), query, e.kind());
        }

        info!(target = %target, query = %query, "Starting discovery run");

        let allow_list = self.allow_list().await;

        let hits = match search_hits(
            self.deps.searcher.as_ref(),
            &query,
            &allow_list,
            self.config.max_results,
        )
        .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                return RunResult::aborted(target.clone(), query, ErrorKind::SearchUnavailable);
            }
        };

        if hits.is_empty() {
            info!(query = %query, "No search results, nothing to extract");
            return RunResult::new(target.clone(), query);
        }

        let context = assemble_context(&hits);

        let candidates = match extract_candidates(
            self.deps.ai.as_ref(),
            self.deps.sleeper.as_ref(),
            &self.config.retry,
            &target.subject,
            &context,
        )
        .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(target = %target, error = %e, "Extraction failed");
                return RunResult::aborted(target.clone(), query, e.kind());
            }
        };

        let mut result = RunResult::new(target.clone(), query);

        let (confident, rejected): (Vec<Candidate>, Vec<Candidate>) = candidates
            .into_iter()
            .partition(|c| c.has_name() && c.is_confident());

        for candidate in &rejected {
            info!(
                name = %candidate.name,
                confidence = candidate.confidence(),
                "Rejected low-confidence candidate"
            );
            result.record(&candidate.name, CandidateFate::RejectedLowConfidence);
        }

        let mut eligible = Vec::with_capacity(confident.len());
        for candidate in confident {
            if self.is_closed(&candidate, &target.locality, &allow_list).await {
                info!(name = %candidate.name, "Rejected closed candidate");
                result.record(&candidate.name, CandidateFate::RejectedClosed);
            } else {
                eligible.push(candidate);
            }
        }

        for candidate in &eligible {
            let outcome = persist_candidate(self.deps.store.as_ref(), candidate).await;
            result.record(candidate.name.trim(), outcome.into());
        }

        info!(
            target = %target,
            accepted = result.accepted.len(),
            rejected = result.rejected_count,
            closed = result.closed.len(),
            duplicates = result.duplicates.len(),
            failed = result.failed.len(),
            "Discovery run completed"
        );

        result
    }

    /// Registry domains, or the fallback set if none are usable.
    async fn allow_list(&self) -> DomainAllowList {
        match self.deps.sources.list_sources().await {
            Ok(sources) => DomainAllowList::from_domains(sources.iter().map(|s| &s.domain)),
            Err(e) => {
                warn!(error = %e, "Could not read source registry, using fallback domains");
                DomainAllowList::from_domains(Vec::<String>::new())
            }
        }
    }

    async fn is_closed(
        &self,
        candidate: &Candidate,
        locality: &str,
        allow_list: &DomainAllowList,
    ) -> bool {
        if !self.config.verify_open_status {
            return false;
        }

        let status = verify_open_status(
            self.deps.searcher.as_ref(),
            self.deps.ai.as_ref(),
            allow_list,
            self.config.verification_max_results,
            candidate.name.trim(),
            locality,
        )
        .await;

        status == OpenStatus::Closed
    }
}
