// Config module for engine settings and file locations

use crate::constants;
use log::warn;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub fn config_dir() -> String {
    std::env::var("DCC_DIR").unwrap_or_else(|_| ".".to_string())
}

pub fn manifest_path() -> String {
    let dir = config_dir();
    if dir == "." {
        constants::MANIFEST_FILE.to_string()
    } else {
        format!("{}/{}", dir, constants::MANIFEST_FILE)
    }
}

/// Tunables for the acquisition tiers and the batch loop
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the marketplace REST API
    pub marketplace_url: String,
    pub http_timeout: Duration,
    pub max_redirects: usize,
    /// REST page size (`limit` query parameter)
    pub page_size: usize,
    /// Pause between REST pages
    pub page_delay: Duration,
    /// Pause between plugins in a batch
    pub plugin_delay: Duration,
    /// Depth cap for the page-state walker
    pub json_depth: usize,
    pub navigation_timeout: Duration,
    pub grid_timeout: Duration,
    pub fallback_timeout: Duration,
    pub load_more_max: usize,
    pub load_more_pause: Duration,
    /// Browser executable; autodetected when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            marketplace_url: constants::DEFAULT_MARKETPLACE_URL.to_string(),
            http_timeout: constants::DEFAULT_HTTP_TIMEOUT,
            max_redirects: constants::DEFAULT_MAX_REDIRECTS,
            page_size: constants::DEFAULT_PAGE_SIZE,
            page_delay: constants::DEFAULT_PAGE_DELAY,
            plugin_delay: constants::DEFAULT_PLUGIN_DELAY,
            json_depth: constants::DEFAULT_JSON_DEPTH,
            navigation_timeout: constants::DEFAULT_NAV_TIMEOUT,
            grid_timeout: constants::DEFAULT_GRID_TIMEOUT,
            fallback_timeout: constants::DEFAULT_FALLBACK_TIMEOUT,
            load_more_max: constants::DEFAULT_LOAD_MORE_MAX,
            load_more_pause: constants::DEFAULT_LOAD_MORE_PAUSE,
            chrome_executable: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `DCC_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            marketplace_url: std::env::var("DCC_MARKETPLACE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.marketplace_url),
            http_timeout: env_secs("DCC_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            max_redirects: env_parse("DCC_MAX_REDIRECTS", defaults.max_redirects),
            page_size: env_parse("DCC_PAGE_SIZE", defaults.page_size).max(1),
            page_delay: env_millis("DCC_PAGE_DELAY_MS", defaults.page_delay),
            plugin_delay: env_millis("DCC_PLUGIN_DELAY_MS", defaults.plugin_delay),
            json_depth: defaults.json_depth,
            navigation_timeout: env_secs("DCC_NAV_TIMEOUT_SECS", defaults.navigation_timeout),
            grid_timeout: env_secs("DCC_GRID_TIMEOUT_SECS", defaults.grid_timeout),
            fallback_timeout: env_secs("DCC_FALLBACK_TIMEOUT_SECS", defaults.fallback_timeout),
            load_more_max: env_parse("DCC_LOAD_MORE_MAX", defaults.load_more_max),
            load_more_pause: env_millis("DCC_LOAD_MORE_PAUSE_MS", defaults.load_more_pause),
            chrome_executable: std::env::var_os("DCC_CHROME").map(PathBuf::from),
        }
    }

    /// Config with every pause removed, for driving the engine against local servers
    pub fn without_delays(mut self) -> Self {
        self.page_delay = Duration::ZERO;
        self.plugin_delay = Duration::ZERO;
        self.load_more_pause = Duration::ZERO;
        self
    }
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn env_secs(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_parse(key, default.as_secs()))
}

fn env_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_parse(key, default.as_millis() as u64))
}
