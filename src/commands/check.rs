// Check command: run the batch over the plugin list and report

use crate::ui;
use dccompat::browser::{BrowserLauncher, ChromiumLauncher, DisabledBrowser};
use dccompat::config::EngineConfig;
use dccompat::manifest::Manifest;
use dccompat::orchestrator::FetchOrchestrator;
use dccompat::progress::LogProgress;
use dccompat::sources::SourceRegistry;
use dccompat::BatchRunner;
use log::debug;
use std::sync::Arc;

pub struct CheckOptions {
    pub target: Option<String>,
    pub json: bool,
    pub output: Option<String>,
    pub no_browser: bool,
}

/// Exit codes:
/// 0 = every plugin was resolved
/// 2 = at least one plugin exhausted all fetch methods
pub async fn check(options: CheckOptions) -> anyhow::Result<i32> {
    let manifest = Manifest::load()
        .map_err(|_| anyhow::anyhow!("Manifest not found. Run 'dccompat init' first."))?;

    let target = options
        .target
        .unwrap_or_else(|| manifest.platform.target.clone());
    let plugins = manifest.descriptors();

    let config = EngineConfig::from_env();
    debug!("Engine config: {:?}", config);

    let launcher: Arc<dyn BrowserLauncher> = if options.no_browser {
        Arc::new(DisabledBrowser)
    } else {
        Arc::new(ChromiumLauncher::new(config.clone()))
    };
    let orchestrator = FetchOrchestrator::new(SourceRegistry::standard(&config)?);
    let runner = BatchRunner::new(orchestrator, launcher, config.plugin_delay);

    let results = if options.json {
        runner.run(&plugins, &target, &LogProgress).await?
    } else {
        let progress = ui::SpinnerProgress::new();
        let results = runner.run(&plugins, &target, &progress).await;
        progress.finish();
        results?
    };

    let rendered = serde_json::to_string_pretty(&results)?;
    if let Some(path) = &options.output {
        std::fs::write(path, &rendered)?;
        if !options.json {
            ui::success(&format!("Wrote results to {}", path));
        }
    }

    if options.json {
        ui::line(&rendered);
    } else {
        ui::print_report(&results);
    }

    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        if !options.json {
            ui::error(&format!("{} plugin(s) could not be resolved", failed));
        }
        Ok(2)
    } else {
        Ok(0)
    }
}
