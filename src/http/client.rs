//! HTTP client for the integrations backend
//!
//! Provides a thin client that handles:
//! - Form-encoded POST requests against a base URL
//! - Extraction of the backend's `detail` message from error responses
//! - Decoding of authorization URLs, credential payloads and item pages
//!
//! Requests are never retried.

use super::endpoints::Endpoint;
use crate::api::{IntegrationApi, Page, PageRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Identity, IntegrationCredentials, IntegrationKind, OptionStringExt};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout (transport default when `None`)
    pub timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let config = Config::default();
        Self {
            base_url: config.base_url,
            timeout: None,
            default_headers: HashMap::new(),
            user_agent: config.user_agent,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

impl From<&Config> for HttpClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.request_timeout(),
            default_headers: HashMap::new(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client for the integrations backend
pub struct HttpClient {
    client: Client,
    base_url: Url,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client from crate-level configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_config(HttpClientConfig::from(config))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Base URL all endpoint paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST form fields to `path` and return the response body of a 2xx reply.
    ///
    /// Non-2xx replies become [`Error::Backend`] carrying the `detail` field
    /// of a JSON error body when there is one.
    pub async fn post_form<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<String> {
        let url = self.build_url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("POST {} failed with {}", url, status.as_u16());
            return Err(Error::backend(status.as_u16(), extract_detail(&body)));
        }

        debug!("POST {} succeeded ({} bytes)", url, body.len());
        Ok(body)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl IntegrationApi for HttpClient {
    async fn authorize(&self, kind: IntegrationKind, identity: &Identity) -> Result<String> {
        let body = self
            .post_form(&Endpoint::Authorize.path(kind), &identity.form_fields())
            .await?;
        parse_authorization_url(&body)
    }

    async fn fetch_credentials(
        &self,
        kind: IntegrationKind,
        identity: &Identity,
    ) -> Result<Option<IntegrationCredentials>> {
        let body = self
            .post_form(&Endpoint::Credentials.path(kind), &identity.form_fields())
            .await?;
        parse_credentials(&body)
    }

    async fn disconnect(&self, kind: IntegrationKind, identity: &Identity) -> Result<()> {
        self.post_form(&Endpoint::Disconnect.path(kind), &identity.form_fields())
            .await?;
        Ok(())
    }

    async fn fetch_page(&self, kind: IntegrationKind, request: &PageRequest) -> Result<Page> {
        let mut form = vec![
            ("credentials", request.credentials.to_form_value()),
            ("limit", request.limit.to_string()),
        ];
        if let Some(after) = &request.after {
            form.push(("after", after.clone()));
        }

        let body = self.post_form(&Endpoint::Items.path(kind), &form).await?;
        parse_page(&body)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Pull the `detail` field out of an error body
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(detail) => Some(detail.clone()).none_if_empty(),
        other => Some(other.to_string()),
    }
}

/// The authorize endpoint answers with a JSON string; plain text is accepted too
fn parse_authorization_url(body: &str) -> Result<String> {
    let trimmed = body.trim();
    let raw = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(url)) => url,
        Ok(other) => {
            return Err(Error::decode(format!(
                "expected an authorization URL, got {other}"
            )))
        }
        Err(_) => trimmed.to_string(),
    };
    Ok(Url::parse(&raw)?.into())
}

fn parse_credentials(body: &str) -> Result<Option<IntegrationCredentials>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body)?;
    let credentials = IntegrationCredentials::new(value);
    Ok((!credentials.is_empty()).then_some(credentials))
}

fn parse_page(body: &str) -> Result<Page> {
    let mut page: Page = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("invalid items page: {e}")))?;
    page.next_cursor = page.next_cursor.none_if_empty();
    Ok(page)
}
