//! Pure decision logic for reconciling one registry record
//!
//! These functions contain NO side effects - they decide whether a record
//! needs creating, updating or nothing at all, and build the request bodies.

use std::collections::BTreeSet;

use idm_core_client::{Identifier, NewOrganization, Organization, OrganizationUpdate};

use crate::domains::organization::models::{is_managed_tag, OrganizationRecord};

/// What to do with a single record
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// No organization carries this (type, code) pair yet
    Create(NewOrganization),
    /// Labels or managed tags drifted
    Update {
        id: String,
        url: String,
        previous_label: String,
        update: OrganizationUpdate,
    },
    /// Already reconciled
    Unchanged,
}

/// Decide how to reconcile `record` against the organization (if any)
/// already holding its identifier.
///
/// Updates map the full name onto `label` and the short name onto
/// `short_label`. Creates use the short name as `label`.
pub fn plan(record: &OrganizationRecord, existing: Option<&Organization>) -> SyncAction {
    let Some(existing) = existing else {
        return SyncAction::Create(NewOrganization {
            label: record.name.clone(),
            short_label: record.name.clone(),
            managed: true,
            identifiers: vec![Identifier::new(record.code_type.as_str(), record.code.clone())],
            tags: record.tag_names().into_iter().collect(),
        });
    };

    let new_tags = merge_tags(&existing.tags, record);
    let current_tags: BTreeSet<String> = existing.tags.iter().cloned().collect();

    let labels_match = existing.short_label.as_deref() == Some(record.name.as_str())
        && existing.label == record.full_name;

    if labels_match && new_tags == current_tags {
        return SyncAction::Unchanged;
    }

    SyncAction::Update {
        id: existing.id.clone(),
        url: existing.url.clone(),
        previous_label: existing.label.clone(),
        update: OrganizationUpdate {
            label: record.full_name.clone(),
            short_label: record.name.clone(),
            tags: new_tags.into_iter().collect(),
        },
    }
}

/// Keep every tag outside the managed vocabulary, replace the managed
/// subset with the record's tags.
pub fn merge_tags(existing: &[String], record: &OrganizationRecord) -> BTreeSet<String> {
    existing
        .iter()
        .filter(|tag| !is_managed_tag(tag))
        .cloned()
        .chain(record.tag_names())
        .collect()
}
