// Sources module for version acquisition tiers

use std::sync::Arc;

use crate::config::EngineConfig;
use anyhow::Result;

pub mod embedded_state;
pub mod hosting;
pub mod http;
pub mod identifiers;
pub mod rendered_dom;
pub mod rest_api;
pub mod source_trait;

pub use embedded_state::EmbeddedStateSource;
pub use rendered_dom::{RenderedDomSource, ScrapeSettings};
pub use rest_api::RestApiSource;
pub use source_trait::{FetchContext, VersionSource};

use http::HttpClient;

/// Sources in the order they are tried
pub struct SourceRegistry {
    sources: Vec<Arc<dyn VersionSource>>,
}

impl SourceRegistry {
    /// The three standard tiers
    /// Priority: embedded-state > rest-api > rendered-dom
    pub fn standard(config: &EngineConfig) -> Result<Self> {
        let http = HttpClient::new(config)?;

        Ok(Self::from_sources(vec![
            Arc::new(EmbeddedStateSource::new(http.clone(), config.json_depth)),
            Arc::new(RestApiSource::new(
                http,
                config.marketplace_url.clone(),
                config.page_size,
                config.page_delay,
            )),
            Arc::new(RenderedDomSource::new(ScrapeSettings::from(config))),
        ]))
    }

    pub fn from_sources(sources: Vec<Arc<dyn VersionSource>>) -> Self {
        Self { sources }
    }

    /// Get sources in priority order
    pub fn priority_order(&self) -> &[Arc<dyn VersionSource>] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchMethod;

    #[test]
    fn test_standard_priority_order() {
        let registry = SourceRegistry::standard(&EngineConfig::default()).unwrap();
        let methods: Vec<FetchMethod> = registry
            .priority_order()
            .iter()
            .map(|s| s.method())
            .collect();

        assert_eq!(
            methods,
            vec![
                FetchMethod::EmbeddedState,
                FetchMethod::RestApi,
                FetchMethod::RenderedDom
            ]
        );
    }
}
