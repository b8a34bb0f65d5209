// Shared HTTP client utilities

use crate::config::EngineConfig;
use crate::error::CompatError;
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode, redirect};
use serde_json::Value;

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("dccompat/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a bounded timeout and redirect limit
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    async fn get_ok(&self, url: &str, accept: &str) -> Result<Response> {
        let response: Response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            anyhow::bail!("Resource not found: {}", url);
        }

        if !response.status().is_success() {
            anyhow::bail!("HTTP request failed: {} ({})", url, response.status());
        }

        Ok(response)
    }

    /// Fetch a page body as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get_ok(url, "text/html,application/xhtml+xml").await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;
        Ok(text)
    }

    /// Fetch a body and parse it as an untyped JSON tree
    pub async fn fetch_json_value(&self, url: &str) -> Result<Value> {
        let response = self.get_ok(url, "application/json").await?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;
        let value = serde_json::from_str(&body)
            .map_err(|e| CompatError::malformed(format!("invalid JSON from {}: {}", url, e)))?;
        Ok(value)
    }
}
