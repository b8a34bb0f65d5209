// Data Center compatibility selection over loosely-shaped upstream JSON

use crate::model::RawVersionRecord;
use crate::version::normalize_version_label;
use serde_json::Value;

/// Keys under which a version node lists its per-product compatibility
const COMPATIBILITY_KEYS: &[&str] = &["compatibilities", "compatibility", "compatibleApplications"];

/// Field names that carry a hosting type string on a compatibility entry
const HOSTING_TYPE_KEYS: &[&str] = &["hosting", "hostingType", "deployment", "deploymentType"];

/// Hosting values that mean Data Center, after normalization
const DATACENTER_VALUES: &[&str] = &["datacenter", "dc"];

/// Lowercase and drop everything but letters and digits ("Data-Center" -> "datacenter")
fn normalize_hosting(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn is_datacenter(value: &str) -> bool {
    DATACENTER_VALUES.contains(&normalize_hosting(value).as_str())
}

/// Follow `path` through nested objects and render the leaf as a string
pub fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    scalar_string(current)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty string found at any of the given paths
fn first_str(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| str_at(value, path))
}

/// Whether a node carries any per-product compatibility data
pub fn has_compatibility(node: &Value) -> bool {
    COMPATIBILITY_KEYS.iter().any(|key| node.get(key).is_some())
}

/// A version bound may be a bare string or an object such as `{"version": "8.0"}`
fn bound(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let v = value.get(key)?;
        scalar_string(v).or_else(|| first_str(v, &[&["version"], &["name"], &["value"]]))
    })
}

fn bounds_of(entry: &Value) -> Option<(String, String)> {
    let min = bound(entry, &["minVersion", "min", "minimumVersion", "from"])?;
    let max = bound(entry, &["maxVersion", "max", "maximumVersion", "to"])?;
    Some((min, max))
}

/// Bounds of a compatibility entry when it is flagged for Data Center
///
/// Two shapes are understood: a flat entry with a hosting type string next to
/// its bounds, and an entry whose `hosting` object has a Data Center child.
fn datacenter_bounds(entry: &Value) -> Option<(String, String)> {
    let flagged = HOSTING_TYPE_KEYS.iter().any(|key| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(is_datacenter)
    });
    if flagged {
        return bounds_of(entry);
    }

    let hosting = entry.get("hosting")?.as_object()?;
    hosting
        .iter()
        .find(|(key, _)| is_datacenter(key))
        .and_then(|(_, dc)| bounds_of(dc))
}

/// Pick the Data Center range out of a version node's compatibility data
pub fn pick_datacenter_compatibility(node: &Value) -> Option<(String, String)> {
    COMPATIBILITY_KEYS.iter().find_map(|key| match node.get(key)? {
        Value::Array(entries) => entries.iter().find_map(datacenter_bounds),
        entry @ Value::Object(_) => datacenter_bounds(entry),
        _ => None,
    })
}

/// Normalize one upstream version object into a record
///
/// The version label comes from `name` or `version`; nodes without one are
/// skipped.
pub fn record_from_node(node: &Value) -> Option<RawVersionRecord> {
    let version = first_str(node, &[&["name"], &["version"], &["versionNumber"]])?;
    Some(record_for_version(node, &version))
}

/// Build a record for `node` under an already chosen version label
pub fn record_for_version(node: &Value, version: &str) -> RawVersionRecord {
    let mut record = RawVersionRecord::new(normalize_version_label(version));
    if let Some((min, max)) = pick_datacenter_compatibility(node) {
        record.compatibility = Some(format!("{} - {}", min, max));
        record = record.with_bounds(min, max);
    }
    record.release_date = first_str(
        node,
        &[&["releaseDate"], &["release", "date"], &["released"], &["date"]],
    );
    record.release_summary = first_str(
        node,
        &[
            &["releaseSummary"],
            &["summary"],
            &["release", "summary"],
            &["text", "releaseSummary"],
        ],
    );

    record
}
