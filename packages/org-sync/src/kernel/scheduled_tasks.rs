//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (SYNC_SCHEDULE, hourly by default)
//!     │
//!     └─► OrganizationSync::run()
//!             └─► load IdM organizations → fetch PRAS tree → create / update
//! ```
//!
//! A failed pass is logged and left for the next trigger; nothing is retried
//! in between.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::organization::{OrganizationSync, RunOutcome};

/// Start the organization sync on `schedule`
pub async fn start_scheduler(sync: Arc<OrganizationSync>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sync_job = Job::new_async(schedule, move |_uuid, _lock| {
        let sync = sync.clone();
        Box::pin(async move {
            run_scheduled_sync(&sync).await;
        })
    })?;

    scheduler.add(sync_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Scheduled organization sync started");
    Ok(scheduler)
}

/// Run one scheduled pass, reporting rather than propagating failure
async fn run_scheduled_sync(sync: &OrganizationSync) {
    match sync.run().await {
        Ok(RunOutcome::Completed(report)) => {
            tracing::info!(
                created = report.created,
                updated = report.updated,
                "Scheduled organization sync finished"
            );
        }
        Ok(RunOutcome::Skipped) => {}
        Err(e) => {
            tracing::error!("Scheduled organization sync failed: {:#}", e);
        }
    }
}
