// Rendered DOM source: scrape the version grid from a headless browser

use crate::browser::BrowserPage;
use crate::config::EngineConfig;
use crate::constants::SELECTOR_POLL_INTERVAL;
use crate::error::CompatError;
use crate::model::{FetchMethod, RawVersionRecord};
use crate::sources::source_trait::{FetchContext, VersionSource};
use crate::version::{normalize_version_label, parse_compatibility_string};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

const GRID_SELECTOR: &str = r#"[role="treegrid"]"#;
const FALLBACK_SELECTOR: &str = r#"[role="grid"], [role="row"], table tr"#;

/// Clicks the first visible, enabled "load more"/"show more" control
const CLICK_LOAD_MORE_JS: &str = r#"(() => {
    const candidates = Array.from(document.querySelectorAll('button, a, [role="button"]'));
    const control = candidates.find((el) => {
        const text = (el.innerText || el.textContent || '').trim().toLowerCase();
        return /^(load|show) more\b/.test(text)
            && !el.disabled
            && el.getAttribute('aria-disabled') !== 'true'
            && el.offsetParent !== null;
    });
    if (!control) {
        return false;
    }
    control.scrollIntoView({ block: 'center' });
    control.click();
    return true;
})()"#;

/// Cell texts of every row with at least three cells, grid first
const EXTRACT_ROWS_JS: &str = r#"(() => {
    const grid = document.querySelector('[role="treegrid"]') || document;
    let rows = Array.from(grid.querySelectorAll('[role="row"]'));
    if (rows.length === 0) {
        rows = Array.from(document.querySelectorAll('table tr'));
    }
    return rows
        .map((row) => Array.from(row.querySelectorAll('[role="gridcell"], [role="cell"], td'))
            .map((cell) => (cell.innerText || cell.textContent || '').trim()))
        .filter((cells) => cells.length >= 3);
})()"#;

lazy_static::lazy_static! {
    /// Leading dotted token in the version cell ("9.1.0 (latest)" -> "9.1.0")
    static ref LEADING_VERSION: Regex = Regex::new(r"^\s*([vV]?\d+(?:\.[0-9A-Za-z_-]+)+)")
        .expect("leading version regex is valid");
}

fn exists_script(selector: &str) -> String {
    format!(
        "document.querySelector({}) !== null",
        serde_json::to_string(selector).unwrap_or_default()
    )
}

/// Timing knobs for one scrape
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub grid_timeout: Duration,
    pub fallback_timeout: Duration,
    pub load_more_max: usize,
    pub load_more_pause: Duration,
    pub poll_interval: Duration,
}

impl From<&EngineConfig> for ScrapeSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            grid_timeout: config.grid_timeout,
            fallback_timeout: config.fallback_timeout,
            load_more_max: config.load_more_max,
            load_more_pause: config.load_more_pause,
            poll_interval: SELECTOR_POLL_INTERVAL,
        }
    }
}

pub struct RenderedDomSource {
    settings: ScrapeSettings,
}

impl RenderedDomSource {
    pub fn new(settings: ScrapeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl VersionSource for RenderedDomSource {
    fn method(&self) -> FetchMethod {
        FetchMethod::RenderedDom
    }

    async fn fetch_versions(&self, ctx: &FetchContext<'_>) -> Result<Vec<RawVersionRecord>> {
        let page = ctx.browser.open_page().await?;

        let result = scrape_versions(page.as_ref(), &ctx.page_url, &self.settings).await;

        // The tab is closed on both paths; a close failure never masks the scrape result
        if let Err(e) = page.close().await {
            warn!("Failed to close browser tab for '{}': {:#}", ctx.plugin.name, e);
        }

        result
    }
}

/// Navigate, expand the grid and parse its rows
pub async fn scrape_versions(
    page: &dyn BrowserPage,
    url: &str,
    settings: &ScrapeSettings,
) -> Result<Vec<RawVersionRecord>> {
    page.navigate(url).await?;

    let grid_found = wait_for_selector(page, GRID_SELECTOR, settings.grid_timeout, settings.poll_interval).await?;
    if !grid_found {
        debug!("No treegrid at {}, waiting for any row-like element", url);
        let fallback_found = wait_for_selector(
            page,
            FALLBACK_SELECTOR,
            settings.fallback_timeout,
            settings.poll_interval,
        )
        .await?;
        if !fallback_found {
            return Err(CompatError::malformed("version grid never appeared").into());
        }
    }

    let clicks = expand_all(page, settings).await?;
    debug!("Expanded version grid with {} click(s)", clicks);

    let rows = page.evaluate(EXTRACT_ROWS_JS).await?;
    let records = parse_rows(&rows);

    if records.is_empty() {
        return Err(CompatError::malformed("no rows with a version in the rendered grid").into());
    }

    Ok(records)
}

/// Poll until `selector` matches or `timeout` elapses
///
/// A failed evaluation counts as "not there yet": a page that is still
/// loading can drop its execution context between polls.
async fn wait_for_selector(
    page: &dyn BrowserPage,
    selector: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<bool> {
    let script = exists_script(selector);
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match page.evaluate(&script).await {
            Ok(found) if found.as_bool() == Some(true) => return Ok(true),
            Ok(_) => {}
            Err(e) => debug!("Polling for {} failed: {:#}", selector, e),
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Click "load more" until it disappears or the click budget runs out
async fn expand_all(page: &dyn BrowserPage, settings: &ScrapeSettings) -> Result<usize> {
    let mut clicks = 0;

    while clicks < settings.load_more_max {
        if page.evaluate(CLICK_LOAD_MORE_JS).await?.as_bool() != Some(true) {
            return Ok(clicks);
        }
        clicks += 1;
        tokio::time::sleep(settings.load_more_pause).await;
    }

    warn!(
        "Stopped expanding version grid after {} clicks; older versions may be missing",
        clicks
    );
    Ok(clicks)
}

/// Turn `[[version, compatibility, date, ...], ...]` into records
pub fn parse_rows(rows: &Value) -> Vec<RawVersionRecord> {
    let Some(rows) = rows.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let cells: Vec<&str> = row.as_array()?.iter().filter_map(Value::as_str).collect();
            if cells.len() < 3 {
                return None;
            }

            let version = LEADING_VERSION.captures(cells[0])?.get(1)?.as_str();
            let compatibility = cells[1].trim();
            let range = parse_compatibility_string(compatibility);

            let mut record = RawVersionRecord::new(normalize_version_label(version));
            if !compatibility.is_empty() {
                record.compatibility = Some(compatibility.to_string());
            }
            record.min_version = range.min_version;
            record.max_version = range.max_version;
            record.release_date = Some(cells[2].trim().to_string()).filter(|d| !d.is_empty());
            Some(record)
        })
        .collect()
}
