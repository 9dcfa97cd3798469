// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Reconciliation (what to create, what to update) lives in domains/organization
// and only talks to the outside world through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOrganizationDirectory)

use anyhow::Result;
use async_trait::async_trait;
use idm_core_client::{NewOrganization, OrganizationPage, OrganizationUpdate};
use pras_client::SourceNode;
use url::Url;

// =============================================================================
// Organisation Structure Source (Infrastructure - authoritative tree)
// =============================================================================

#[async_trait]
pub trait BaseOrgStructureSource: Send + Sync {
    /// Fetch the full organisation structure tree
    async fn fetch_structure(&self) -> Result<SourceNode>;
}

// =============================================================================
// Organization Directory (Infrastructure - destination collection)
// =============================================================================

#[async_trait]
pub trait BaseOrganizationDirectory: Send + Sync {
    /// URL of the first page of the collection
    fn organizations_url(&self) -> Result<Url>;

    /// Fetch one page of the collection
    async fn fetch_page(&self, url: &Url) -> Result<OrganizationPage>;

    /// Create a brand-new organization
    async fn create(&self, organization: &NewOrganization) -> Result<()>;

    /// Replace label, short label and tags of the organization at `url`
    async fn update(&self, url: &str, update: &OrganizationUpdate) -> Result<()>;
}
