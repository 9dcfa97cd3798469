//! Pure IdM core REST client for the organization collection.
//!
//! Covers what a directory sync needs: reading the paginated collection,
//! creating managed organizations and replacing labels/tags on existing
//! ones. Authentication is carried by the injected `reqwest::Client`.
//!
//! # Example
//!
//! ```rust,ignore
//! use idm_core_client::IdmCoreClient;
//!
//! let client = IdmCoreClient::new(reqwest::Client::new(), base_url);
//!
//! let mut url = client.organizations_url()?;
//! loop {
//!     let page = client.fetch_page(&url).await?;
//!     // ...
//!     match page.next {
//!         Some(next) => url = url.join(&next)?,
//!         None => break,
//!     }
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{IdmCoreError, Result};
pub use types::{Identifier, NewOrganization, Organization, OrganizationPage, OrganizationUpdate};

use serde::de::DeserializeOwned;
use url::Url;

const ORGANIZATIONS_PATH: &str = "organization/";

#[derive(Debug, Clone)]
pub struct IdmCoreClient {
    client: reqwest::Client,
    base_url: Url,
}

impl IdmCoreClient {
    /// `base_url` is the API root; it should end with `/` so that relative
    /// paths join beneath it.
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// URL of the first page of the organization collection.
    pub fn organizations_url(&self) -> Result<Url> {
        Ok(self.base_url.join(ORGANIZATIONS_PATH)?)
    }

    /// Fetch a single page of the organization collection.
    pub async fn fetch_page(&self, url: &Url) -> Result<OrganizationPage> {
        tracing::debug!(%url, "Fetching organization page");

        let resp = self.client.get(url.clone()).send().await?;
        read_json(resp).await
    }

    /// Create a new organization in the collection.
    pub async fn create_organization(&self, organization: &NewOrganization) -> Result<()> {
        let url = self.organizations_url()?;
        let resp = self.client.post(url).json(organization).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Replace label, short label and tags of the organization at `url`.
    ///
    /// Relative record URLs are resolved against the API root.
    pub async fn update_organization(&self, url: &str, update: &OrganizationUpdate) -> Result<()> {
        let url = self.base_url.join(url)?;
        let resp = self.client.put(url).json(update).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(IdmCoreError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let resp = ensure_success(resp).await?;
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
