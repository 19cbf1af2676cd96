//! API Client
//!
//! Main client for the JSON:API backend, combining the resolved base URL,
//! bearer token and HTTP functionality.

use super::http::{ApiHttpClient, ApiResponse};
use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Main API client
#[derive(Clone)]
pub struct ApiClient {
    pub http: ApiHttpClient,
    pub base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client. `token` of `None` sends unauthenticated requests.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

        let http = ApiHttpClient::new().context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build a request URL from an API path such as `/v1/objectives`
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .with_context(|| format!("Invalid request path: {}", path))?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.url(path, query)?;
        let label = format!("{} {}", method, url.path());
        let response = self
            .http
            .send(method, url, self.token.as_deref(), body)
            .await
            .context(label)?;
        Ok(response)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse> {
        self.send(Method::GET, path, query, None).await
    }

    /// Make a POST request with a JSON:API document body
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// Make a PATCH request with a JSON:API document body
    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::DELETE, path, &[], None).await
    }
}

/// Path of one member of a collection, with the id percent-encoded
pub fn member_path(collection_path: &str, id: &str) -> String {
    format!(
        "{}/{}",
        collection_path.trim_end_matches('/'),
        urlencoding::encode(id.trim())
    )
}
