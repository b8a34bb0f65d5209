// Fetch orchestration: try each tier in priority order, first success wins

use crate::browser::BrowserSession;
use crate::error::{CompatError, TierFailure};
use crate::model::{FetchMethod, PluginDescriptor, RawVersionRecord};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::sources::identifiers::{extract_addon_identifiers, version_history_url};
use crate::sources::{FetchContext, SourceRegistry};
use log::{debug, warn};

/// Records acquired for one plugin and the tier that produced them
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub method: FetchMethod,
    pub records: Vec<RawVersionRecord>,
}

pub struct FetchOrchestrator {
    registry: SourceRegistry,
}

impl FetchOrchestrator {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Acquire version records for one plugin
    ///
    /// Tiers run one after another; the first to return at least one record
    /// wins and later tiers are never touched. Tier errors are collected and
    /// only surface as `AllMethodsExhausted`.
    pub async fn acquire(
        &self,
        plugin: &PluginDescriptor,
        browser: &dyn BrowserSession,
        progress: &dyn ProgressSink,
    ) -> Result<Acquisition, CompatError> {
        let ctx = FetchContext {
            plugin,
            page_url: version_history_url(&plugin.marketplace_url),
            identifiers: extract_addon_identifiers(&plugin.marketplace_url),
            browser,
        };
        debug!(
            "Resolved '{}' to {} (id={:?}, slug={:?})",
            plugin.name, ctx.page_url, ctx.identifiers.id, ctx.identifiers.slug
        );

        let mut failures = Vec::new();

        for source in self.registry.priority_order() {
            let method = source.method();

            if !source.is_applicable(&ctx) {
                progress.emit(ProgressEvent::MethodSkipped {
                    plugin: plugin.name.clone(),
                    method,
                    reason: "no add-on id or slug in URL".to_string(),
                });
                continue;
            }

            progress.emit(ProgressEvent::MethodAttempt {
                plugin: plugin.name.clone(),
                method,
            });

            let reason = match source.fetch_versions(&ctx).await {
                Ok(records) if !records.is_empty() => {
                    progress.emit(ProgressEvent::MethodSucceeded {
                        plugin: plugin.name.clone(),
                        method,
                        versions: records.len(),
                    });
                    return Ok(Acquisition { method, records });
                }
                Ok(_) => "returned no versions".to_string(),
                Err(e) => format!("{:#}", e),
            };

            warn!("{} failed for '{}': {}", method, plugin.name, reason);
            progress.emit(ProgressEvent::MethodFailed {
                plugin: plugin.name.clone(),
                method,
                reason: reason.clone(),
            });
            failures.push(TierFailure { method, reason });
        }

        Err(CompatError::AllMethodsExhausted { failures })
    }
}
