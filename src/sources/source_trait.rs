// Trait definition for version sources

use crate::browser::BrowserSession;
use crate::model::{FetchMethod, Identifiers, PluginDescriptor, RawVersionRecord};
use anyhow::Result;

/// Everything a tier needs to look up one plugin
pub struct FetchContext<'a> {
    pub plugin: &'a PluginDescriptor,
    /// Normalized version history page URL
    pub page_url: String,
    pub identifiers: Identifiers,
    /// Shared browser session, borrowed for the duration of the attempt
    pub browser: &'a dyn BrowserSession,
}

/// Trait for acquisition tiers (embedded page state, REST API, rendered DOM)
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// The tier this source implements
    fn method(&self) -> FetchMethod;

    /// Whether the tier can run at all for this plugin
    ///
    /// Sources that are not applicable are skipped without recording a failure.
    fn is_applicable(&self, _ctx: &FetchContext<'_>) -> bool {
        true
    }

    /// Fetch every published version of the plugin
    ///
    /// # Returns
    /// At least one record, or an error describing why none were found
    async fn fetch_versions(&self, ctx: &FetchContext<'_>) -> Result<Vec<RawVersionRecord>>;
}
