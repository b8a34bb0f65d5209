// Marketplace REST source (paginated `/rest/2/addons/{key}/versions`)

use crate::error::CompatError;
use crate::model::{FetchMethod, RawVersionRecord};
use crate::sources::hosting;
use crate::sources::http::HttpClient;
use crate::sources::source_trait::{FetchContext, VersionSource};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

pub struct RestApiSource {
    http: HttpClient,
    base_url: String,
    page_size: usize,
    page_delay: Duration,
}

impl RestApiSource {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        page_size: usize,
        page_delay: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
            page_delay,
        }
    }

    fn page_url(&self, key: &str, offset: usize) -> String {
        format!(
            "{}/rest/2/addons/{}/versions?hosting=datacenter&limit={}&offset={}",
            self.base_url,
            urlencoding::encode(key),
            self.page_size,
            offset
        )
    }

    /// Fetch every page for `key`; any failing page discards what was gathered
    pub async fn fetch_all(&self, key: &str) -> Result<Vec<RawVersionRecord>> {
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            if offset > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let url = self.page_url(key, offset);
            debug!("Fetching versions page: {}", url);
            let page = self.http.fetch_json_value(&url).await?;

            let items = page_items(&page)?;
            let count = items.len();
            records.extend(items.iter().filter_map(hosting::record_from_node));

            if count == 0 || count < self.page_size {
                break;
            }
            offset += count;
        }

        if records.is_empty() {
            return Err(
                CompatError::malformed(format!("no versions returned for add-on '{}'", key)).into(),
            );
        }

        Ok(records)
    }
}

/// Version items live under `versions` or `_embedded.versions`
fn page_items(page: &Value) -> Result<&[Value]> {
    let items = page
        .get("versions")
        .or_else(|| page.get("_embedded").and_then(|e| e.get("versions")));

    match items {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(CompatError::malformed(format!(
            "expected a versions array, found {}",
            json_kind(other)
        ))
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl VersionSource for RestApiSource {
    fn method(&self) -> FetchMethod {
        FetchMethod::RestApi
    }

    fn is_applicable(&self, ctx: &FetchContext<'_>) -> bool {
        ctx.identifiers.api_key().is_some()
    }

    async fn fetch_versions(&self, ctx: &FetchContext<'_>) -> Result<Vec<RawVersionRecord>> {
        let key = ctx.identifiers.api_key().ok_or_else(|| {
            anyhow::anyhow!("No add-on id or slug in '{}'", ctx.plugin.marketplace_url)
        })?;
        self.fetch_all(key).await
    }
}
