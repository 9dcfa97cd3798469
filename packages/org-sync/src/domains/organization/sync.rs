//! Entry point for scheduled and one-shot runs.
//!
//! At most one pass runs at a time per `OrganizationSync`. A trigger that
//! arrives while a pass is in flight is skipped rather than queued; the next
//! scheduled trigger picks up whatever changed.

use anyhow::Result;
use tokio::sync::Mutex;

use super::reconciler::{Reconciler, SyncReport};
use crate::kernel::SyncDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(SyncReport),
    /// Another pass was already running
    Skipped,
}

pub struct OrganizationSync {
    reconciler: Reconciler,
    running: Mutex<()>,
}

impl OrganizationSync {
    pub fn new(deps: SyncDeps) -> Self {
        Self {
            reconciler: Reconciler::new(deps),
            running: Mutex::new(()),
        }
    }

    /// Run one full pass unless one is already in progress.
    pub async fn run(&self) -> Result<RunOutcome> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("Organization sync already running, skipping this trigger");
            return Ok(RunOutcome::Skipped);
        };

        tracing::info!("Starting organization sync");
        let report = self.reconciler.run().await?;
        Ok(RunOutcome::Completed(report))
    }
}
