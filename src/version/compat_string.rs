// Extraction of a [min, max] range from free-form compatibility text

use super::compare::compare_versions;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

lazy_static::lazy_static! {
    /// Alphanumeric runs joined by at least one dot, e.g. "8.0", "9.2.1", "v10.x"
    static ref DOTTED_TOKEN: Regex = Regex::new(r"[0-9A-Za-z]+(?:\.[0-9A-Za-z]+)+")
        .expect("dotted token regex is valid");
}

/// Bounds pulled out of a compatibility string; both absent when none were found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatRange {
    pub min_version: Option<String>,
    pub max_version: Option<String>,
}

impl CompatRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min_version: Some(min.into()),
            max_version: Some(max.into()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.min_version.is_some() && self.max_version.is_some()
    }
}

/// Pull a version range out of text like `"Confluence Data Center 8.0 - 9.0"`
///
/// Every dotted token is collected. One token is both bounds, several give
/// first and last (swapped when they appear in descending order).
pub fn parse_compatibility_string(text: &str) -> CompatRange {
    let tokens: Vec<&str> = DOTTED_TOKEN.find_iter(text).map(|m| m.as_str()).collect();

    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return CompatRange::default();
    };

    if compare_versions(first, last) == Ordering::Greater {
        CompatRange::new(*last, *first)
    } else {
        CompatRange::new(*first, *last)
    }
}
