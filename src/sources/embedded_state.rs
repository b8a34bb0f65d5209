// Embedded page state source: the JSON data island in the version history HTML

use crate::constants::{INITIAL_STATE_ID, MAX_VERSION_LABEL_LEN};
use crate::error::CompatError;
use crate::model::{FetchMethod, RawVersionRecord};
use crate::sources::hosting;
use crate::sources::http::HttpClient;
use crate::sources::source_trait::{FetchContext, VersionSource};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref INITIAL_STATE_SCRIPT: Regex = Regex::new(&format!(
        r#"(?is)<script\b[^>]*\bid\s*=\s*["']?{}["']?[^>]*>(.*?)</script>"#,
        regex::escape(INITIAL_STATE_ID)
    ))
    .expect("initial-state regex is valid");

    /// Short dotted labels such as "8.1.0" or "2.3.1-beta"
    static ref VERSION_LABEL: Regex = Regex::new(r"^v?\d+(?:\.[0-9A-Za-z_-]+)+$")
        .expect("version label regex is valid");

    /// `window.__STATE__ = {...};` style wrappers around the JSON payload
    static ref JS_ASSIGNMENT: Regex = Regex::new(r"(?s)^[\w.$\[\]'\x22]+\s*=\s*(.*?);?\s*$")
        .expect("assignment regex is valid");
}

pub struct EmbeddedStateSource {
    http: HttpClient,
    max_depth: usize,
}

impl EmbeddedStateSource {
    pub fn new(http: HttpClient, max_depth: usize) -> Self {
        Self { http, max_depth }
    }
}

#[async_trait]
impl VersionSource for EmbeddedStateSource {
    fn method(&self) -> FetchMethod {
        FetchMethod::EmbeddedState
    }

    async fn fetch_versions(&self, ctx: &FetchContext<'_>) -> Result<Vec<RawVersionRecord>> {
        let html = self.http.fetch_text(&ctx.page_url).await?;
        let records = extract_versions_from_html(&html, self.max_depth)?;
        debug!(
            "Embedded state for '{}' yielded {} version(s)",
            ctx.plugin.name,
            records.len()
        );
        Ok(records)
    }
}

/// Locate the data island, decode it and walk it for version nodes
pub fn extract_versions_from_html(html: &str, max_depth: usize) -> Result<Vec<RawVersionRecord>> {
    let raw = extract_initial_state(html).ok_or_else(|| {
        CompatError::malformed(format!("{} script tag not found", INITIAL_STATE_ID))
    })?;

    let state = decode_state(raw)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    walk(&state, 0, max_depth, &mut records, &mut seen);

    if records.is_empty() {
        return Err(CompatError::malformed("no version entries found in embedded state").into());
    }

    Ok(records)
}

/// Raw contents of the `initial-state` script tag
pub fn extract_initial_state(html: &str) -> Option<&str> {
    INITIAL_STATE_SCRIPT
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Parse the island, retrying with HTML entities decoded
pub fn decode_state(raw: &str) -> Result<Value> {
    let payload = strip_assignment(raw);

    let first_error = match parse_json(payload) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let unescaped = unescape_entities(payload);
    parse_json(&unescaped).map_err(|second_error| {
        CompatError::malformed(format!(
            "embedded state is not valid JSON ({}; after unescaping: {})",
            first_error, second_error
        ))
        .into()
    })
}

fn strip_assignment(raw: &str) -> &str {
    if raw.starts_with('{') || raw.starts_with('[') || raw.starts_with('"') {
        return raw;
    }
    JS_ASSIGNMENT
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(raw)
}

/// Parse JSON, unwrapping one level of string encoding if present
fn parse_json(text: &str) -> serde_json::Result<Value> {
    match serde_json::from_str(text)? {
        Value::String(inner) => serde_json::from_str(&inner),
        value => Ok(value),
    }
}

fn unescape_entities(text: &str) -> String {
    // &amp; last so "&amp;quot;" decodes to "&quot;" rather than a quote
    text.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#x22;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// The first of `name`/`version` that reads like a version label
fn version_label(node: &Value) -> Option<&str> {
    ["name", "version"].iter().find_map(|key| {
        let label = node.get(key)?.as_str()?.trim();
        (label.len() <= MAX_VERSION_LABEL_LEN && VERSION_LABEL.is_match(label)).then_some(label)
    })
}

/// Depth-bounded descent collecting version nodes
///
/// A node qualifies when it has a version-like label and compatibility data;
/// qualifying nodes are not descended into. Duplicate versions keep the first
/// occurrence.
fn walk(
    value: &Value,
    depth: usize,
    max_depth: usize,
    records: &mut Vec<RawVersionRecord>,
    seen: &mut HashSet<String>,
) {
    if depth > max_depth {
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(label) = version_label(value)
                && hosting::has_compatibility(value)
            {
                let record = hosting::record_for_version(value, label);
                if seen.insert(record.version.clone()) {
                    records.push(record);
                }
                return;
            }
            for child in map.values() {
                walk(child, depth + 1, max_depth, records, seen);
            }
        }
        Value::Array(items) => {
            for child in items {
                walk(child, depth + 1, max_depth, records, seen);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(script_body: &str) -> String {
        format!(
            "<html><head><script src=\"app.js\"></script><script id=\"initial-state\" type=\"application/json\">{}</script></head><body></body></html>",
            script_body
        )
    }

    fn sample_state() -> Value {
        json!({
            "app": {"name": "ScriptRunner", "key": "com.onresolve.confluence.groovy"},
            "versionHistory": {
                "versions": [
                    {
                        "name": "9.1.0",
                        "releaseDate": "2024-06-01",
                        "releaseSummary": "New listeners",
                        "compatibilities": [
                            {"hosting": "datacenter", "minVersion": "8.5", "maxVersion": "9.2"}
                        ]
                    },
                    {
                        "name": "8.0.0",
                        "compatibilities": [
                            {"hosting": "server", "minVersion": "7.0", "maxVersion": "7.19"}
                        ]
                    }
                ]
            }
        })
    }

    #[test]
    fn test_extract_plain_json() {
        let html = page(&sample_state().to_string());
        let records = extract_versions_from_html(&html, 15).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version, "9.1.0");
        assert_eq!(records[0].min_version.as_deref(), Some("8.5"));
        assert_eq!(records[0].max_version.as_deref(), Some("9.2"));
        assert_eq!(records[0].release_summary.as_deref(), Some("New listeners"));
        assert_eq!(records[1].version, "8.0.0");
        assert_eq!(records[1].min_version, None);
    }

    #[test]
    fn test_extract_entity_escaped_json() {
        let escaped = sample_state().to_string().replace('"', "&quot;");
        let records = extract_versions_from_html(&page(&escaped), 15).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_double_encoded_json() {
        let encoded = serde_json::to_string(&sample_state().to_string()).unwrap();
        let records = extract_versions_from_html(&page(&encoded), 15).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_assignment_wrapper() {
        let body = format!("window.__INITIAL_STATE__ = {};", sample_state());
        let records = extract_versions_from_html(&page(&body), 15).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_marker() {
        let err = extract_versions_from_html("<html><body>nothing</body></html>", 15).unwrap_err();
        assert!(err.to_string().contains("initial-state script tag not found"));
    }

    #[test]
    fn test_unparseable_state() {
        let err = extract_versions_from_html(&page("{not json"), 15).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_no_qualifying_nodes() {
        let err = extract_versions_from_html(&page(r#"{"app": {"name": "Gliffy"}}"#), 15).unwrap_err();
        assert!(err.to_string().contains("no version entries"));
    }

    #[test]
    fn test_depth_cap() {
        let mut state = json!({
            "name": "1.0.0",
            "compatibilities": [{"hosting": "dc", "min": "8.0", "max": "9.0"}]
        });
        for _ in 0..20 {
            state = json!({ "wrapper": state });
        }

        let mut records = Vec::new();
        walk(&state, 0, 15, &mut records, &mut HashSet::new());
        assert!(records.is_empty());

        walk(&state, 0, 25, &mut records, &mut HashSet::new());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let state = json!({
            "a": [{"name": "2.0", "releaseDate": "first", "compatibilities": []}],
            "b": [{"name": "2.0", "releaseDate": "second", "compatibilities": []}]
        });
        let mut records = Vec::new();
        walk(&state, 0, 15, &mut records, &mut HashSet::new());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].release_date.as_deref(), Some("first"));
    }

    #[test]
    fn test_version_field_wins_over_app_name() {
        let state = json!({
            "versions": [{
                "name": "ScriptRunner for Confluence",
                "version": "8.1.0",
                "compatibilities": [{"hosting": "datacenter", "minVersion": "8.0", "maxVersion": "9.0"}]
            }]
        });
        let mut records = Vec::new();
        walk(&state, 0, 15, &mut records, &mut HashSet::new());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version, "8.1.0");
        assert_eq!(records[0].min_version.as_deref(), Some("8.0"));
        assert_eq!(records[0].max_version.as_deref(), Some("9.0"));
    }

    #[test]
    fn test_prefixed_labels_are_normalized() {
        let state = json!([
            {"name": "v10.0.0", "compatibilities": []},
            {"name": "v9.0.0", "compatibilities": []},
            {"name": "10.0.0", "compatibilities": []}
        ]);
        let mut records = Vec::new();
        walk(&state, 0, 15, &mut records, &mut HashSet::new());

        let versions: Vec<&str> = records.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["10.0.0", "9.0.0"]);
    }

    #[test]
    fn test_long_or_undotted_labels_are_ignored() {
        let state = json!([
            {"name": "Confluence", "compatibilities": []},
            {"name": "12", "compatibilities": []},
            {"version": "1.2.3.4.5.6.7.8.9.10.11.12.13.14.15", "compatibilities": []}
        ]);
        let mut records = Vec::new();
        walk(&state, 0, 15, &mut records, &mut HashSet::new());
        assert!(records.is_empty());
    }
}
