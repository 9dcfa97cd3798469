use anyhow::{Context, Result};
use dotenvy::dotenv;
use pras_client::DEFAULT_PRAS_URL;
use std::env;
use std::time::Duration;
use url::Url;

use crate::common::ApiToken;

/// Hourly, on the hour (six-field cron: sec min hour dom mon dow).
pub const DEFAULT_SYNC_SCHEDULE: &str = "0 0 * * * *";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Worker configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub pras_url: Url,
    /// API root of the IdM core; always ends with `/`
    pub idm_core_api_url: Url,
    pub api_token: Option<ApiToken>,
    pub client_principal_name: Option<String>,
    pub sync_schedule: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pras_url = lookup("PRAS_URL").unwrap_or_else(|| DEFAULT_PRAS_URL.to_string());
        let idm_core_api_url = lookup("IDM_CORE_API_URL").context("IDM_CORE_API_URL must be set")?;
        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            pras_url: Url::parse(&pras_url).context("PRAS_URL must be an absolute URL")?,
            idm_core_api_url: api_root(&idm_core_api_url)
                .context("IDM_CORE_API_URL must be an absolute URL")?,
            api_token: lookup("IDM_API_TOKEN")
                .filter(|token| !token.is_empty())
                .map(ApiToken::from),
            client_principal_name: lookup("CLIENT_PRINCIPAL_NAME").filter(|name| !name.is_empty()),
            sync_schedule: lookup("SYNC_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_SYNC_SCHEDULE.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse an API root, making sure relative paths join beneath it.
fn api_root(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("IDM_CORE_API_URL", "https://idm.example/api/")]).unwrap();

        assert_eq!(config.pras_url.as_str(), DEFAULT_PRAS_URL);
        assert_eq!(config.sync_schedule, DEFAULT_SYNC_SCHEDULE);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.api_token.is_none());
        assert!(config.client_principal_name.is_none());
    }

    #[test]
    fn test_api_root_gains_trailing_slash() {
        let config = config_from(&[("IDM_CORE_API_URL", "https://idm.example/api")]).unwrap();

        assert_eq!(config.idm_core_api_url.as_str(), "https://idm.example/api/");
        assert_eq!(
            config.idm_core_api_url.join("organization/").unwrap().as_str(),
            "https://idm.example/api/organization/"
        );
    }

    #[test]
    fn test_missing_idm_url_is_an_error() {
        let err = config_from(&[]).unwrap_err();

        assert!(err.to_string().contains("IDM_CORE_API_URL"));
    }

    #[test]
    fn test_relative_idm_url_is_rejected() {
        assert!(config_from(&[("IDM_CORE_API_URL", "/api/")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("IDM_CORE_API_URL", "https://idm.example/api/"),
            ("PRAS_URL", "https://pras.example/structure"),
            ("IDM_API_TOKEN", "s3cret"),
            ("CLIENT_PRINCIPAL_NAME", "org-sync@EXAMPLE"),
            ("SYNC_SCHEDULE", "0 */15 * * * *"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.pras_url.as_str(), "https://pras.example/structure");
        assert!(config.api_token.is_some());
        assert_eq!(config.client_principal_name.as_deref(), Some("org-sync@EXAMPLE"));
        assert_eq!(config.sync_schedule, "0 */15 * * * *");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }
}
