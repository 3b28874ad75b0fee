//! Vercel domain API client.
//!
//! # Architecture
//!
//! - [`DomainProvider`] is the seam the DNS synchronizer depends on
//! - [`VercelClient`] implements it over the Vercel REST API with `reqwest`
//! - [`types::ProviderDnsConfig`] classifies the opaque JSON response
//!
//! # Endpoint
//!
//! ```text
//! GET {VERCEL_API_BASE_URL}/projects/{projectId}/domains/{domain}
//! Authorization: Bearer {VERCEL_API_TOKEN}
//! ```

pub mod types;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use types::ProviderDnsConfig;

use crate::config::VercelConfig;

/// Errors that can occur when interacting with the Vercel API.
#[derive(Debug, Error)]
pub enum VercelError {
    /// A required credential is not configured. No request was sent.
    #[error("Vercel {0} is not configured")]
    NotConfigured(&'static str),

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// API returned a non-success response.
    #[error("API error: {status} - {body}")]
    Api { status: StatusCode, body: String },

    /// Response body was not JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of a custom domain's configuration.
#[async_trait]
pub trait DomainProvider: Send + Sync {
    /// Fetch the provider's raw configuration for `domain`.
    async fn domain_config(&self, domain: &str) -> Result<serde_json::Value, VercelError>;
}

/// Vercel REST API client.
#[derive(Clone)]
pub struct VercelClient {
    client: reqwest::Client,
    api_base_url: String,
    api_token: Option<SecretString>,
    project_id: Option<String>,
}

impl VercelClient {
    /// Create a new Vercel API client.
    ///
    /// Missing credentials are accepted here and reported on first use.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VercelConfig) -> Result<Self, VercelError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopforge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            project_id: config.project_id.clone(),
        })
    }

    fn domain_url(&self, project_id: &str, domain: &str) -> String {
        format!(
            "{}/projects/{}/domains/{}",
            self.api_base_url,
            urlencoding::encode(project_id),
            urlencoding::encode(domain)
        )
    }
}

#[async_trait]
impl DomainProvider for VercelClient {
    async fn domain_config(&self, domain: &str) -> Result<serde_json::Value, VercelError> {
        let token = self
            .api_token
            .as_ref()
            .ok_or(VercelError::NotConfigured("API token"))?;
        let project_id = self
            .project_id
            .as_deref()
            .ok_or(VercelError::NotConfigured("project ID"))?;

        let url = self.domain_url(project_id, domain);
        tracing::debug!(%url, "Fetching Vercel domain config");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VercelError::Api { status, body });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        serde_json::from_str(&body).map_err(|e| VercelError::Parse(e.to_string()))
    }
}

fn map_transport_error(e: reqwest::Error) -> VercelError {
    if e.is_timeout() {
        VercelError::Timeout
    } else {
        VercelError::Http(e)
    }
}
