// Organization domain - keeps IdM core organizations in step with PRAS
//
// Responsibilities:
// - Flattening the PRAS tree into typed, tagged records
// - Indexing the existing IdM organizations by identifier
// - Creating missing organizations and updating drifted labels/tags
// - Leaving tags outside the managed vocabulary untouched

pub mod extractor;
pub mod index;
pub mod models;
pub mod reconciler;
pub mod sync;
pub mod utils;

pub use index::OrganizationIndex;
pub use models::*;
pub use reconciler::{Reconciler, SyncReport};
pub use sync::{OrganizationSync, RunOutcome};
pub use utils::sync_logic::SyncAction;
