//! In-memory index of the organizations already held by the IdM core.

use std::collections::HashMap;

use anyhow::{Context, Result};
use idm_core_client::Organization;

use super::models::CodeType;
use crate::kernel::BaseOrganizationDirectory;

/// Every existing organization, reachable by any of its identifiers.
#[derive(Debug, Default)]
pub struct OrganizationIndex {
    organizations: Vec<Organization>,
    /// identifier type -> identifier value -> position in `organizations`
    by_identifier: HashMap<String, HashMap<String, usize>>,
}

impl OrganizationIndex {
    /// Page through the whole collection and index it.
    ///
    /// Any page failure aborts the load; no partial index is returned.
    pub async fn load(directory: &dyn BaseOrganizationDirectory) -> Result<Self> {
        let mut index = Self::default();
        let mut url = directory.organizations_url()?;
        let mut pages = 0usize;

        loop {
            let page = directory
                .fetch_page(&url)
                .await
                .with_context(|| format!("Failed to fetch organization page {url}"))?;
            pages += 1;

            for organization in page.results {
                index.insert(organization);
            }

            match page.next.as_deref().filter(|next| !next.is_empty()) {
                Some(next) => {
                    url = url
                        .join(next)
                        .with_context(|| format!("Invalid next page pointer: {next}"))?;
                }
                None => break,
            }
        }

        tracing::info!(
            organizations = index.len(),
            pages,
            "Loaded existing organizations"
        );
        Ok(index)
    }

    /// Add an organization under each of its identifiers. A later
    /// organization claiming the same identifier replaces the earlier one.
    pub fn insert(&mut self, organization: Organization) {
        let position = self.organizations.len();
        for identifier in &organization.identifiers {
            self.by_identifier
                .entry(identifier.id_type.clone())
                .or_default()
                .insert(identifier.value.clone(), position);
        }
        self.organizations.push(organization);
    }

    pub fn get(&self, code_type: CodeType, code: &str) -> Option<&Organization> {
        self.get_by_identifier(code_type.as_str(), code)
    }

    pub fn get_by_identifier(&self, id_type: &str, value: &str) -> Option<&Organization> {
        self.by_identifier
            .get(id_type)
            .and_then(|values| values.get(value))
            .map(|&position| &self.organizations[position])
    }

    /// All loaded organizations, in collection order.
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

impl FromIterator<Organization> for OrganizationIndex {
    fn from_iter<I: IntoIterator<Item = Organization>>(iter: I) -> Self {
        let mut index = Self::default();
        for organization in iter {
            index.insert(organization);
        }
        index
    }
}
