//! One full reconciliation pass of the registry against the IdM core.
//!
//! ```text
//! Reconciler::run()
//!     ├─► OrganizationIndex::load()        (every page of the collection)
//!     ├─► fetch_structure()                (one registry request)
//!     └─► flatten() → for each record: plan() → create / update / skip
//! ```
//!
//! Records are processed strictly in order. The first failed call aborts the
//! pass; creates and updates already made stay in place.

use std::collections::HashSet;

use anyhow::{Context, Result};

use super::extractor;
use super::index::OrganizationIndex;
use super::models::{CodeType, OrganizationRecord};
use super::utils::sync_logic::{plan, SyncAction};
use crate::kernel::SyncDeps;

/// Outcome counts of a completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Records whose (type, code) pair was already seen earlier in the same tree.
    pub duplicates: usize,
}

impl SyncReport {
    /// Number of write calls made against the IdM core.
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }
}

pub struct Reconciler {
    deps: SyncDeps,
}

impl Reconciler {
    pub fn new(deps: SyncDeps) -> Self {
        Self { deps }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let index = OrganizationIndex::load(self.deps.directory.as_ref())
            .await
            .context("Failed to load existing organizations")?;

        let tree = self
            .deps
            .source
            .fetch_structure()
            .await
            .context("Failed to fetch organisation structure")?;

        let records = extractor::flatten(&tree, None);
        tracing::info!(records = records.len(), "Flattened organisation structure");

        let mut report = SyncReport::default();
        let mut seen: HashSet<(CodeType, &str)> = HashSet::new();

        for record in &records {
            // TODO: collisions are only reported; which branch should win needs a product decision.
            if !seen.insert(record.key()) {
                report.duplicates += 1;
                tracing::warn!(
                    code = %record.code,
                    code_type = %record.code_type,
                    "Organisation code appears more than once in the structure"
                );
            }

            self.reconcile(record, &index, &mut report).await?;
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            duplicates = report.duplicates,
            "Organization sync complete"
        );
        Ok(report)
    }

    async fn reconcile(
        &self,
        record: &OrganizationRecord,
        index: &OrganizationIndex,
        report: &mut SyncReport,
    ) -> Result<()> {
        let existing = index.get(record.code_type, &record.code);

        match plan(record, existing) {
            SyncAction::Create(organization) => {
                self.deps
                    .directory
                    .create(&organization)
                    .await
                    .with_context(|| format!("Failed to create organization for {}", record.code))?;
                report.created += 1;
                tracing::info!(
                    code = %record.code,
                    name = %record.name,
                    "Created organization"
                );
            }
            SyncAction::Update {
                id,
                url,
                previous_label,
                update,
            } => {
                self.deps
                    .directory
                    .update(&url, &update)
                    .await
                    .with_context(|| format!("Failed to update organization {id} ({})", record.code))?;
                report.updated += 1;
                tracing::info!(
                    %id,
                    code = %record.code,
                    from = %previous_label,
                    to = %update.label,
                    "Updated organization"
                );
            }
            SyncAction::Unchanged => {
                report.unchanged += 1;
                tracing::debug!(code = %record.code, "Organization already up to date");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{
        organization, MockOrgStructureSource, MockOrganizationDirectory,
    };
    use idm_core_client::Identifier;
    use serde_json::json;
    use std::sync::Arc;

    fn sync_with(
        source: MockOrgStructureSource,
        directory: MockOrganizationDirectory,
    ) -> (Reconciler, Arc<MockOrgStructureSource>, Arc<MockOrganizationDirectory>) {
        let source = Arc::new(source);
        let directory = Arc::new(directory);
        let reconciler = Reconciler::new(SyncDeps::new(source.clone(), directory.clone()));
        (reconciler, source, directory)
    }

    fn university() -> serde_json::Value {
        json!({
            "Level1Entities": [{
                "Level1EntityCode": "10",
                "Level1EntityName": "Medical Sciences",
                "Level1EntityFullName": "Medical Sciences Division",
                "Level2Entities": [{
                    "Level2EntityCode": "3C05",
                    "Level2EntityName": "Pathology",
                    "Level2EntityFullName": "Sir William Dunn School of Pathology",
                }],
            }, {
                "Level1EntityCode": "0A",
                "Level1EntityName": "GLAM",
                "Level1EntityFullName": "Gardens, Libraries and Museums",
                "Level2Entities": [{
                    "Level2EntityCode": "QB",
                    "Level2EntityName": "Bodleian Libraries",
                }],
            }, {
                "Level1EntityCode": "SM",
                "Level1EntityName": "Regent's Park College",
            }],
        })
    }

    #[tokio::test]
    async fn test_empty_directory_creates_everything() {
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(university()),
            MockOrganizationDirectory::new(),
        );

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.created, 5);
        assert_eq!(report.updated, 0);

        let creates = directory.creates();
        assert_eq!(creates[0].identifiers, vec![Identifier::new("pras:division", "10")]);
        assert_eq!(creates[0].label, "Medical Sciences");
        assert_eq!(creates[0].tags, vec!["division".to_string(), "unit".to_string()]);
        assert!(creates.iter().all(|c| c.managed));

        let bodleian = creates
            .iter()
            .find(|c| c.identifiers[0].value == "QB")
            .unwrap();
        assert_eq!(bodleian.identifiers[0].id_type, "finance");
        assert_eq!(bodleian.tags, vec!["bodleian".to_string()]);

        let regents = creates
            .iter()
            .find(|c| c.identifiers[0].value == "SM")
            .unwrap();
        assert_eq!(
            regents.tags,
            vec!["college".to_string(), "pph".to_string(), "unit".to_string()]
        );
    }

    #[tokio::test]
    async fn test_drifted_short_label_issues_one_update() {
        let source = MockOrgStructureSource::from_json(json!({
            "Level1EntityCode": "SM",
            "Level1EntityName": "Regent's Park",
            "Level1EntityFullName": "Regent's Park College",
        }));
        let mut existing = organization(
            "41",
            "Regent's Park College",
            &[("finance", "SM")],
            &["pph", "hall", "bodleian"],
        );
        existing.short_label = Some("Regents Park".into());
        let (reconciler, _, directory) =
            sync_with(source, MockOrganizationDirectory::new().with_organization(existing.clone()));

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.updated, 1);
        assert!(directory.creates().is_empty());
        let updates = directory.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, existing.url);
        assert_eq!(updates[0].1.label, "Regent's Park College");
        assert_eq!(updates[0].1.short_label, "Regent's Park");
        assert_eq!(
            updates[0].1.tags,
            vec!["hall".to_string(), "pph".to_string(), "unit".to_string()]
        );
    }

    #[tokio::test]
    async fn test_second_run_makes_no_writes() {
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(json!({
                "Level1Entities": [{
                    "Level1EntityCode": "10",
                    "Level1EntityName": "Medical Sciences",
                    "Level2Entities": [{"Level2EntityCode": "3C05", "Level2EntityName": "Pathology"}],
                }, {
                    "Level1EntityCode": "SO",
                    "Level1EntityName": "Somerville",
                    "Level1EntityFullName": "Somerville College",
                }],
            })),
            MockOrganizationDirectory::new()
                .with_page_size(1)
                .with_organization(organization(
                    "5",
                    "Somerville Hall",
                    &[("finance", "SO")],
                    &["unit", "heritage"],
                )),
        );

        let first = reconciler.run().await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(first.updated, 1);

        directory.clear_calls();
        let second = reconciler.run().await.unwrap();

        assert_eq!(second.writes(), 0);
        assert_eq!(second.unchanged, 3);
        assert!(directory.creates().is_empty());
        assert!(directory.updates().is_empty());
        assert_eq!(
            directory.find("finance", "SO").unwrap().tags,
            vec!["heritage".to_string(), "unit".to_string()]
        );
    }

    #[tokio::test]
    async fn test_join_key_is_type_and_code() {
        // "3C05" exists but as a finance code, not a department.
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(json!({
                "Level1EntityCode": "3C05",
                "Level1EntityName": "Pathology",
            })),
            MockOrganizationDirectory::new().with_organization(organization(
                "8",
                "Pathology",
                &[("finance", "3C05")],
                &["unit"],
            )),
        );

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(
            directory.creates()[0].identifiers,
            vec![Identifier::new("pras:department", "3C05")]
        );
    }

    #[tokio::test]
    async fn test_failed_create_aborts_remaining_records() {
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(university()),
            MockOrganizationDirectory::new().failing_create("3C05"),
        );

        let err = reconciler.run().await.unwrap_err();

        assert!(err.to_string().contains("3C05"));
        let attempted: Vec<String> = directory
            .creates()
            .iter()
            .map(|c| c.identifiers[0].value.clone())
            .collect();
        assert_eq!(attempted, vec!["10".to_string(), "3C05".to_string()]);
        // The division created before the failure stays.
        assert!(directory.find("pras:division", "10").is_some());
        assert!(directory.find("finance", "QB").is_none());
    }

    #[tokio::test]
    async fn test_failed_update_aborts_run() {
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(university()),
            MockOrganizationDirectory::new().failing_update("10").with_organization(organization(
                "1",
                "Medicine",
                &[("pras:division", "10")],
                &[],
            )),
        );

        assert!(reconciler.run().await.is_err());
        assert_eq!(directory.updates().len(), 1);
        assert!(directory.creates().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_happens_after_index_load() {
        let (reconciler, source, directory) = sync_with(
            MockOrgStructureSource::from_json(university()).failing(),
            MockOrganizationDirectory::new(),
        );

        assert!(reconciler.run().await.is_err());
        assert_eq!(directory.page_requests().len(), 1);
        assert_eq!(source.fetch_count(), 1);
        assert!(directory.creates().is_empty());
    }

    #[tokio::test]
    async fn test_index_failure_skips_source_fetch() {
        let (reconciler, source, _) = sync_with(
            MockOrgStructureSource::from_json(university()),
            MockOrganizationDirectory::new().failing_page(1),
        );

        assert!(reconciler.run().await.is_err());
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_codes_are_counted_and_still_processed() {
        let (reconciler, _, directory) = sync_with(
            MockOrgStructureSource::from_json(json!({
                "Level1Entities": [
                    {"Level1EntityCode": "3C05", "Level1EntityName": "Pathology"},
                    {"Level1EntityCode": "3C05", "Level1EntityName": "Pathology (old)"},
                ],
            })),
            MockOrganizationDirectory::new(),
        );

        let report = reconciler.run().await.unwrap();

        assert_eq!(report.duplicates, 1);
        assert_eq!(report.created, 2);
        assert_eq!(directory.creates().len(), 2);
    }
}
