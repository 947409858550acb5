//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (SENTINEL_SCHEDULE, daily 19:00 by default)
//!     │
//!     └─► Sentinel::run_once()
//!             └─► For each watchlist target → discovery pipeline
//! ```

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::batch::Sentinel;

/// Start the watchlist batch on a cron schedule.
pub async fn start_scheduler(sentinel: Arc<Sentinel>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let batch_job = Job::new_async(schedule, move |_uuid, _lock| {
        let sentinel = sentinel.clone();
        Box::pin(async move {
            match sentinel.run_once().await {
                Ok(report) => tracing::info!(
                    targets = report.targets,
                    new_records = report.new_records,
                    "Scheduled batch finished"
                ),
                Err(e) => tracing::error!("Scheduled batch failed: {}", e),
            }
        })
    })?;

    scheduler.add(batch_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Scheduled watchlist batch started");
    Ok(scheduler)
}
