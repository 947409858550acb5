//! Per-target run outcome.

use crate::error::ErrorKind;

use super::restaurant::PersistedRestaurant;
use super::target::Target;

/// Terminal state of one candidate within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateFate {
    /// Below the confidence threshold or unnamed
    RejectedLowConfidence,
    /// Verification judged it permanently closed
    RejectedClosed,
    /// Written to the store
    Persisted(PersistedRestaurant),
    /// Name already present; store left untouched
    DuplicateSkipped,
    /// Store failed for this candidate only
    PersistFailed(String),
}

/// A candidate the store refused for a reason other than duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub name: String,
    pub reason: String,
}

/// Summary of one pipeline run for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub target: Target,
    pub query: String,
    /// Records inserted by this run, in extraction order
    pub accepted: Vec<PersistedRestaurant>,
    /// Candidates dropped by the confidence filter
    pub rejected_count: usize,
    /// Names verification judged closed
    pub closed: Vec<String>,
    /// Names already in the store
    pub duplicates: Vec<String>,
    pub failed: Vec<PersistFailure>,
    /// Set when the run aborted early
    pub error: Option<ErrorKind>,
}

impl RunResult {
    pub fn new(target: Target, query: impl Into<String>) -> Self {
        Self {
            target,
            query: query.into(),
            accepted: Vec::new(),
            rejected_count: 0,
            closed: Vec::new(),
            duplicates: Vec::new(),
            failed: Vec::new(),
            error: None,
        }
    }

    /// Abort with empty results.
    pub fn aborted(target: Target, query: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            ..Self::new(target, query)
        }
    }

    /// Fold a candidate's terminal state into the summary.
    pub fn record(&mut self, name: &str, fate: CandidateFate) {
        match fate {
            CandidateFate::RejectedLowConfidence => self.rejected_count += 1,
            CandidateFate::RejectedClosed => self.closed.push(name.to_string()),
            CandidateFate::Persisted(record) => self.accepted.push(record),
            CandidateFate::DuplicateSkipped => self.duplicates.push(name.to_string()),
            CandidateFate::PersistFailed(reason) => self.failed.push(PersistFailure {
                name: name.to_string(),
                reason,
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
