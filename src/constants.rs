// Constants module for shared defaults and upstream contract strings

use std::time::Duration;

pub const MANIFEST_FILE: &str = "plugins.toml";
pub const DEFAULT_TARGET_VERSION: &str = "9.2.0";
pub const DEFAULT_MARKETPLACE_URL: &str = "https://marketplace.atlassian.com";

/// Path segment appended to a marketplace listing to reach its version history
pub const VERSION_HISTORY_SEGMENT: &str = "version-history";
/// Query string pinned onto every version history URL
pub const VERSION_HISTORY_QUERY: &str = "versionHistoryHosting=dataCenter";

/// Path segments that follow an app id but are never a slug
pub const NON_SLUG_SEGMENTS: &[&str] = &[
    "version-history",
    "versions",
    "overview",
    "reviews",
    "pricing",
    "support",
    "privacy-and-security",
    "integrations",
];

/// `id` attribute of the script tag holding the page's JSON data island
pub const INITIAL_STATE_ID: &str = "initial-state";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_PLUGIN_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_JSON_DEPTH: usize = 15;

pub const DEFAULT_NAV_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_GRID_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOAD_MORE_MAX: usize = 25;
pub const DEFAULT_LOAD_MORE_PAUSE: Duration = Duration::from_millis(1500);
/// Interval between DOM polls while waiting for a selector
pub const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Longest string still considered a version label when walking page state
pub const MAX_VERSION_LABEL_LEN: usize = 32;
