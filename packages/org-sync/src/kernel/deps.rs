//! Sync dependencies (using traits for testability)
//!
//! This module provides the dependency container handed to the reconciler.
//! Both external systems sit behind trait abstractions; the real adapters
//! share one authenticated `reqwest::Client`, which acts as the session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use idm_core_client::{IdmCoreClient, NewOrganization, OrganizationPage, OrganizationUpdate};
use pras_client::{PrasClient, SourceNode};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::kernel::{BaseOrgStructureSource, BaseOrganizationDirectory};

// =============================================================================
// PrasClient Adapter (implements BaseOrgStructureSource trait)
// =============================================================================

/// Wrapper around PrasClient that implements BaseOrgStructureSource trait
pub struct PrasAdapter(pub Arc<PrasClient>);

impl PrasAdapter {
    pub fn new(client: Arc<PrasClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseOrgStructureSource for PrasAdapter {
    async fn fetch_structure(&self) -> Result<SourceNode> {
        Ok(self.0.fetch_structure().await?)
    }
}

// =============================================================================
// IdmCoreClient Adapter (implements BaseOrganizationDirectory trait)
// =============================================================================

/// Wrapper around IdmCoreClient that implements BaseOrganizationDirectory trait
pub struct IdmCoreAdapter(pub Arc<IdmCoreClient>);

impl IdmCoreAdapter {
    pub fn new(client: Arc<IdmCoreClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseOrganizationDirectory for IdmCoreAdapter {
    fn organizations_url(&self) -> Result<Url> {
        Ok(self.0.organizations_url()?)
    }

    async fn fetch_page(&self, url: &Url) -> Result<OrganizationPage> {
        Ok(self.0.fetch_page(url).await?)
    }

    async fn create(&self, organization: &NewOrganization) -> Result<()> {
        Ok(self.0.create_organization(organization).await?)
    }

    async fn update(&self, url: &str, update: &OrganizationUpdate) -> Result<()> {
        Ok(self.0.update_organization(url, update).await?)
    }
}

// =============================================================================
// SyncDeps
// =============================================================================

/// Dependencies of a sync pass (using traits for testability)
#[derive(Clone)]
pub struct SyncDeps {
    /// Authoritative organisation structure
    pub source: Arc<dyn BaseOrgStructureSource>,
    /// Organization collection being kept in step with the source
    pub directory: Arc<dyn BaseOrganizationDirectory>,
}

impl SyncDeps {
    pub fn new(
        source: Arc<dyn BaseOrgStructureSource>,
        directory: Arc<dyn BaseOrganizationDirectory>,
    ) -> Self {
        Self { source, directory }
    }

    /// Wire the real clients from configuration, sharing one HTTP session.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_http_client(config)?;

        let pras = PrasClient::new(http.clone(), config.pras_url.clone());
        let idm = IdmCoreClient::new(http, config.idm_core_api_url.clone());

        Ok(Self::new(
            Arc::new(PrasAdapter::new(Arc::new(pras))),
            Arc::new(IdmCoreAdapter::new(Arc::new(idm))),
        ))
    }
}

/// Build the authenticated client used for every outbound call.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.api_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .context("IDM_API_TOKEN contains characters not allowed in a header")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.http_timeout)
        .build()
        .context("Failed to create HTTP client")
}
