//! Pure PRAS organisation-structure REST client.
//!
//! Fetches the nested division/department tree published by the
//! organisation-structure registry. Authentication is carried by the
//! injected `reqwest::Client` (default headers, proxies, timeouts).
//!
//! # Example
//!
//! ```rust,ignore
//! use pras_client::PrasClient;
//!
//! let client = PrasClient::new(reqwest::Client::new(), url);
//!
//! let root = client.fetch_structure().await?;
//! for division in root.children() {
//!     println!("{} {}", division.code(), division.name());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{PrasError, Result};
pub use types::SourceNode;

use reqwest::header::ACCEPT;
use url::Url;

/// Public endpoint serving the full organisation structure.
pub const DEFAULT_PRAS_URL: &str = "https://orgstr-bp.it.ox.ac.uk/api/OrganisationStructure";

#[derive(Debug, Clone)]
pub struct PrasClient {
    client: reqwest::Client,
    url: Url,
}

impl PrasClient {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the whole organisation structure in a single request.
    pub async fn fetch_structure(&self) -> Result<SourceNode> {
        tracing::debug!(url = %self.url, "Fetching organisation structure");

        let resp = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PrasError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.bytes().await?;
        let root: SourceNode = serde_json::from_slice(&body)?;
        Ok(root)
    }
}
