//! Watchlist batch runner.
//!
//! One batch walks the watchlist in insertion order and runs the discovery
//! pipeline for each target. Targets never affect each other: a failed run is
//! recorded on its `RunResult` and the batch moves on.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use discovery::{
    DiscoveryConfig, DiscoveryPipeline, Result, RunResult, Sleeper, WatchlistStore,
};

use crate::kernel::SentinelDeps;

/// Outcome of one pass over the watchlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Targets on the watchlist when the batch started
    pub targets: usize,
    /// One result per target, in watchlist order
    pub results: Vec<RunResult>,
    /// Records inserted across all targets
    pub new_records: usize,
}

impl BatchReport {
    /// Targets whose run aborted early.
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.is_ok()).count()
    }
}

/// Runs the discovery pipeline over the watchlist.
pub struct Sentinel {
    pipeline: DiscoveryPipeline,
    watchlist: Arc<dyn WatchlistStore>,
    sleeper: Arc<dyn Sleeper>,
    politeness_delay: Duration,
}

impl Sentinel {
    pub fn new(config: DiscoveryConfig, deps: SentinelDeps, politeness_delay: Duration) -> Self {
        Self {
            pipeline: DiscoveryPipeline::new(config, deps.pipeline_deps()),
            watchlist: deps.watchlist,
            sleeper: deps.sleeper,
            politeness_delay,
        }
    }

    /// Run one batch.
    ///
    /// Only a failure to read the watchlist itself is returned as an error.
    pub async fn run_once(&self) -> Result<BatchReport> {
        let entries = self.watchlist.list_targets().await?;

        if entries.is_empty() {
            info!("Watchlist is empty, nothing to scan");
            return Ok(BatchReport::default());
        }

        info!(targets = entries.len(), "Starting watchlist batch");

        let mut report = BatchReport {
            targets: entries.len(),
            ..Default::default()
        };

        for (index, entry) in entries.iter().enumerate() {
            if index > 0 && !self.politeness_delay.is_zero() {
                self.sleeper.sleep(self.politeness_delay).await;
            }

            let target = entry.target();
            let result = self.pipeline.run(&target).await;

            if let Some(kind) = result.error {
                warn!(target = %target, error = %kind, "Target run failed");
            }

            if let Err(e) = self.watchlist.mark_checked(&entry.subject, Utc::now()).await {
                warn!(subject = %entry.subject, error = %e, "Failed to update last_checked");
            }

            report.new_records += result.accepted.len();
            report.results.push(result);
        }

        info!(
            targets = report.targets,
            new_records = report.new_records,
            failed = report.failed(),
            "Watchlist batch completed"
        );

        Ok(report)
    }
}
