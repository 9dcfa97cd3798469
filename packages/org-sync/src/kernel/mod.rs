//! Kernel module - sync infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{build_http_client, IdmCoreAdapter, PrasAdapter, SyncDeps};
pub use scheduled_tasks::start_scheduler;
pub use traits::*;
