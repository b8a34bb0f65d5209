// Batch runner: one plugin at a time over a shared browser session

use crate::browser::BrowserLauncher;
use crate::error::CompatError;
use crate::model::{PluginDescriptor, PluginResult};
use crate::orchestrator::FetchOrchestrator;
use crate::progress::{PluginOutcome, ProgressEvent, ProgressSink};
use crate::result_builder;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

pub struct BatchRunner {
    orchestrator: FetchOrchestrator,
    launcher: Arc<dyn BrowserLauncher>,
    plugin_delay: Duration,
}

impl BatchRunner {
    pub fn new(
        orchestrator: FetchOrchestrator,
        launcher: Arc<dyn BrowserLauncher>,
        plugin_delay: Duration,
    ) -> Self {
        Self {
            orchestrator,
            launcher,
            plugin_delay,
        }
    }

    /// Resolve every plugin against `target_version`
    ///
    /// Results come back in input order, one per plugin. A plugin whose tiers
    /// all fail gets a degraded result; only bad input or a browser that cannot
    /// be launched fail the batch.
    pub async fn run(
        &self,
        plugins: &[PluginDescriptor],
        target_version: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<PluginResult>, CompatError> {
        let target_version = target_version.trim();
        if target_version.is_empty() {
            return Err(CompatError::InputValidation(
                "target version is required".to_string(),
            ));
        }
        if plugins.is_empty() {
            return Err(CompatError::InputValidation(
                "plugin list is empty".to_string(),
            ));
        }

        let session = self.launcher.launch().await?;

        let total = plugins.len();
        progress.emit(ProgressEvent::BatchStarted {
            total,
            target_version: target_version.to_string(),
        });

        let mut results = Vec::with_capacity(total);
        for (index, plugin) in plugins.iter().enumerate() {
            if index > 0 && !self.plugin_delay.is_zero() {
                tokio::time::sleep(self.plugin_delay).await;
            }

            progress.emit(ProgressEvent::PluginStarted {
                index,
                total,
                name: plugin.name.clone(),
            });

            let result = match self
                .orchestrator
                .acquire(plugin, session.as_ref(), progress)
                .await
            {
                Ok(acquisition) => result_builder::build_result(
                    plugin,
                    target_version,
                    acquisition.method,
                    acquisition.records,
                ),
                Err(e) => PluginResult::failed(plugin, target_version, e.to_string()),
            };

            progress.emit(ProgressEvent::PluginFinished {
                index,
                total,
                name: plugin.name.clone(),
                outcome: outcome_of(&result),
            });
            results.push(result);
        }

        if let Err(e) = session.shutdown().await {
            warn!("Failed to release browser session: {:#}", e);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!("Batch finished: {} plugin(s), {} failed", total, failed);
        progress.emit(ProgressEvent::BatchFinished { total, failed });

        Ok(results)
    }
}

fn outcome_of(result: &PluginResult) -> PluginOutcome {
    let recommended = result.recommended_version.clone();
    match result.compatible {
        Some(true) => PluginOutcome::Compatible { recommended },
        Some(false) => PluginOutcome::Incompatible { recommended },
        None => PluginOutcome::Failed,
    }
}
