//! Open/closed verification of confident candidates.
//!
//! A second, narrower search is judged by the model. Only a clear CLOSED
//! verdict excludes a candidate. Missing evidence, unparseable answers and
//! provider failures all resolve to [`DEFAULT_ON_UNCERTAINTY`].

use tracing::{debug, info, warn};

use crate::traits::{ai::AI, searcher::WebSearcher};
use crate::types::source::DomainAllowList;

use super::prompts::verification_prompt;
use super::search::{assemble_context, search_hits};

/// Business status of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Open,
    Closed,
}

/// Status assumed when the evidence does not settle it.
pub const DEFAULT_ON_UNCERTAINTY: OpenStatus = OpenStatus::Open;

/// What the model said about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Open,
    Closed,
    Uncertain,
}

impl Verdict {
    pub fn resolve(self) -> OpenStatus {
        match self {
            Verdict::Open => OpenStatus::Open,
            Verdict::Closed => OpenStatus::Closed,
            Verdict::Uncertain => DEFAULT_ON_UNCERTAINTY,
        }
    }
}

/// Secondary search query keyed on the candidate name.
pub fn verification_query(name: &str, locality: &str) -> String {
    format!("\"{}\" {} permanently closed", name.trim(), locality)
}

/// Read the first word of a judgment.
pub fn parse_verdict(text: &str) -> Verdict {
    let first = text
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();

    match first.as_str() {
        "OPEN" => Verdict::Open,
        "CLOSED" => Verdict::Closed,
        _ => Verdict::Uncertain,
    }
}

/// Judge whether a named restaurant is still operating.
pub async fn verify_open_status(
    searcher: &dyn WebSearcher,
    ai: &dyn AI,
    allow_list: &DomainAllowList,
    max_results: usize,
    name: &str,
    locality: &str,
) -> OpenStatus {
    let query = verification_query(name, locality);

    let hits = match search_hits(searcher, &query, allow_list, max_results).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(name, error = %e, "Verification search failed, assuming open");
            return DEFAULT_ON_UNCERTAINTY;
        }
    };

    if hits.is_empty() {
        debug!(name, "No verification evidence, assuming open");
        return DEFAULT_ON_UNCERTAINTY;
    }

    let prompt = verification_prompt(name, locality, &assemble_context(&hits));
    let verdict = match ai.generate(&prompt).await {
        Ok(text) => parse_verdict(&text),
        Err(e) => {
            warn!(name, error = %e, "Verification judgment failed, assuming open");
            Verdict::Uncertain
        }
    };

    let status = verdict.resolve();
    info!(name, ?verdict, ?status, "Verified candidate");
    status
}
