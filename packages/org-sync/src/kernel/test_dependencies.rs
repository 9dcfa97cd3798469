// Test dependencies - mock implementations for testing
//
// Provides in-memory stand-ins for the registry and the IdM core that can be
// injected into SyncDeps. The directory mock behaves like the real collection:
// it paginates, applies creates and updates, and records every call.

use anyhow::{bail, Result};
use async_trait::async_trait;
use idm_core_client::{
    Identifier, NewOrganization, Organization, OrganizationPage, OrganizationUpdate,
};
use pras_client::SourceNode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use super::{BaseOrgStructureSource, BaseOrganizationDirectory};

const MOCK_API_ROOT: &str = "https://idm.test/api/";

/// Build an existing organization for seeding a mock directory.
///
/// `short_label` starts equal to `label`; tweak the returned value for
/// anything more specific.
pub fn organization(
    id: &str,
    label: &str,
    identifiers: &[(&str, &str)],
    tags: &[&str],
) -> Organization {
    Organization {
        id: id.to_string(),
        url: format!("{MOCK_API_ROOT}organization/{id}/"),
        label: label.to_string(),
        short_label: Some(label.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        identifiers: identifiers
            .iter()
            .map(|(id_type, value)| Identifier::new(*id_type, *value))
            .collect(),
    }
}

// =============================================================================
// Mock Organisation Structure Source
// =============================================================================

pub struct MockOrgStructureSource {
    tree: Arc<Mutex<SourceNode>>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockOrgStructureSource {
    pub fn new(tree: SourceNode) -> Self {
        Self {
            tree: Arc::new(Mutex::new(tree)),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Build from a registry JSON document
    pub fn from_json(value: serde_json::Value) -> Self {
        Self::new(serde_json::from_value(value).expect("valid organisation structure"))
    }

    /// Every fetch fails
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Replace the tree served by later fetches
    pub fn set_tree(&self, tree: SourceNode) {
        *self.tree.lock().unwrap() = tree;
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseOrgStructureSource for MockOrgStructureSource {
    async fn fetch_structure(&self) -> Result<SourceNode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("mock registry unavailable");
        }
        Ok(self.tree.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Organization Directory
// =============================================================================

pub struct MockOrganizationDirectory {
    organizations: Arc<Mutex<Vec<Organization>>>,
    page_size: usize,
    page_requests: Arc<Mutex<Vec<Url>>>,
    creates: Arc<Mutex<Vec<NewOrganization>>>,
    updates: Arc<Mutex<Vec<(String, OrganizationUpdate)>>>,
    failing_page: Option<usize>,
    failing_create: Option<String>,
    failing_update: Option<String>,
}

impl MockOrganizationDirectory {
    pub fn new() -> Self {
        Self {
            organizations: Arc::new(Mutex::new(Vec::new())),
            page_size: 100,
            page_requests: Arc::new(Mutex::new(Vec::new())),
            creates: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
            failing_page: None,
            failing_create: None,
            failing_update: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Seed an existing organization
    pub fn with_organization(self, organization: Organization) -> Self {
        self.organizations.lock().unwrap().push(organization);
        self
    }

    /// Fetching the given (1-based) page fails
    pub fn failing_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Creating an organization with this code fails
    pub fn failing_create(mut self, code: &str) -> Self {
        self.failing_create = Some(code.to_string());
        self
    }

    /// Updating the organization carrying this identifier value fails
    pub fn failing_update(mut self, code: &str) -> Self {
        self.failing_update = Some(code.to_string());
        self
    }

    /// Current state of the collection
    pub fn organizations(&self) -> Vec<Organization> {
        self.organizations.lock().unwrap().clone()
    }

    /// Find an organization by identifier
    pub fn find(&self, id_type: &str, value: &str) -> Option<Organization> {
        self.organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| {
                o.identifiers
                    .iter()
                    .any(|i| i.id_type == id_type && i.value == value)
            })
            .cloned()
    }

    pub fn page_requests(&self) -> Vec<Url> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<NewOrganization> {
        self.creates.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, OrganizationUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    /// Forget recorded calls, keeping the collection
    pub fn clear_calls(&self) {
        self.page_requests.lock().unwrap().clear();
        self.creates.lock().unwrap().clear();
        self.updates.lock().unwrap().clear();
    }
}

impl Default for MockOrganizationDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOrganizationDirectory for MockOrganizationDirectory {
    fn organizations_url(&self) -> Result<Url> {
        Ok(Url::parse(MOCK_API_ROOT)?.join("organization/")?)
    }

    async fn fetch_page(&self, url: &Url) -> Result<OrganizationPage> {
        self.page_requests.lock().unwrap().push(url.clone());

        let page: usize = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1);
        if self.failing_page == Some(page) {
            bail!("mock page {page} unavailable");
        }

        let organizations = self.organizations.lock().unwrap();
        let start = (page - 1) * self.page_size;
        let results: Vec<Organization> = organizations
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = (start + self.page_size < organizations.len())
            .then(|| format!("?page={}", page + 1));

        Ok(OrganizationPage { results, next })
    }

    async fn create(&self, organization: &NewOrganization) -> Result<()> {
        self.creates.lock().unwrap().push(organization.clone());

        let code = organization
            .identifiers
            .first()
            .map(|i| i.value.as_str())
            .unwrap_or_default();
        if self.failing_create.as_deref() == Some(code) {
            bail!("mock create rejected for {code}");
        }

        let mut organizations = self.organizations.lock().unwrap();
        let id = format!("new-{}", organizations.len() + 1);
        organizations.push(Organization {
            url: format!("{MOCK_API_ROOT}organization/{id}/"),
            id,
            label: organization.label.clone(),
            short_label: Some(organization.short_label.clone()),
            tags: organization.tags.clone(),
            identifiers: organization.identifiers.clone(),
        });
        Ok(())
    }

    async fn update(&self, url: &str, update: &OrganizationUpdate) -> Result<()> {
        self.updates
            .lock()
            .unwrap()
            .push((url.to_string(), update.clone()));

        let mut organizations = self.organizations.lock().unwrap();
        let Some(existing) = organizations.iter_mut().find(|o| o.url == url) else {
            bail!("mock organization not found at {url}");
        };
        if let Some(code) = &self.failing_update {
            if existing.identifiers.iter().any(|i| &i.value == code) {
                bail!("mock update rejected for {code}");
            }
        }

        existing.label = update.label.clone();
        existing.short_label = Some(update.short_label.clone());
        existing.tags = update.tags.clone();
        Ok(())
    }
}
