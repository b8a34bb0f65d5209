// Data model shared by the acquisition tiers, the result builder and reports

use serde::Serialize;
use std::fmt;

/// A plugin whose compatibility should be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
    pub marketplace_url: String,
    pub current_version: String,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        marketplace_url: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            marketplace_url: marketplace_url.into(),
            current_version: current_version.into(),
        }
    }
}

/// Marketplace keys derived from a listing URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub id: Option<String>,
    pub slug: Option<String>,
}

impl Identifiers {
    /// Key for the REST endpoint, preferring the numeric id
    pub fn api_key(&self) -> Option<&str> {
        self.id.as_deref().or(self.slug.as_deref())
    }
}

/// The acquisition tiers, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMethod {
    EmbeddedState,
    RestApi,
    RenderedDom,
}

impl FetchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMethod::EmbeddedState => "embedded-state",
            FetchMethod::RestApi => "rest-api",
            FetchMethod::RenderedDom => "rendered-dom",
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published plugin version as any tier reports it
///
/// Bounds may be absent; they are then derived from `compatibility` when the
/// record is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVersionRecord {
    pub version: String,
    pub compatibility: Option<String>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
    pub release_date: Option<String>,
    pub release_summary: Option<String>,
}

impl RawVersionRecord {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_version = Some(min.into());
        self.max_version = Some(max.into());
        self
    }

    pub fn with_compatibility(mut self, text: impl Into<String>) -> Self {
        self.compatibility = Some(text.into());
        self
    }
}

/// A record proven to cover the target version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibleVersionEntry {
    pub plugin_version: String,
    /// Normalized `"min - max"`
    pub compatibility_range: String,
    /// Upstream text, or the normalized range when upstream gave none
    pub compatibility: String,
    pub release_date: Option<String>,
    pub release_summary: Option<String>,
}

/// Per-plugin outcome of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginResult {
    pub plugin_name: String,
    pub plugin_url: String,
    pub current_version: String,
    pub target_version: String,
    pub fetch_method: Option<FetchMethod>,
    /// `None` only when every tier failed
    pub compatible: Option<bool>,
    pub compatible_versions: Vec<CompatibleVersionEntry>,
    pub compatible_version_range: Option<String>,
    pub recommended_version: Option<String>,
    pub total_versions_checked: usize,
    pub all_versions: Vec<RawVersionRecord>,
    pub error: Option<String>,
}

impl PluginResult {
    /// Degraded result for a plugin whose acquisition failed entirely
    pub fn failed(plugin: &PluginDescriptor, target_version: &str, error: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin.name.clone(),
            plugin_url: plugin.marketplace_url.clone(),
            current_version: plugin.current_version.clone(),
            target_version: target_version.to_string(),
            fetch_method: None,
            compatible: None,
            compatible_versions: Vec::new(),
            compatible_version_range: None,
            recommended_version: None,
            total_versions_checked: 0,
            all_versions: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.compatible.is_none()
    }
}
