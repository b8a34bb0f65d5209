// Result construction: match acquired versions against the target release

use crate::model::{
    CompatibleVersionEntry, FetchMethod, PluginDescriptor, PluginResult, RawVersionRecord,
};
use crate::version::{compare_versions, is_version_in_range, parse_compatibility_string};
use std::cmp::Ordering;

/// Bounds of a record, re-parsed from its compatibility text when missing
fn resolve_bounds(record: &RawVersionRecord) -> Option<(String, String)> {
    if let (Some(min), Some(max)) = (&record.min_version, &record.max_version) {
        return Some((min.clone(), max.clone()));
    }

    let range = parse_compatibility_string(record.compatibility.as_deref()?);
    Some((range.min_version?, range.max_version?))
}

/// Records whose range covers `target_version`, in input order
pub fn compatible_entries(
    records: &[RawVersionRecord],
    target_version: &str,
) -> Vec<CompatibleVersionEntry> {
    records
        .iter()
        .filter_map(|record| {
            let (min, max) = resolve_bounds(record)?;
            if !is_version_in_range(target_version, Some(&min), Some(&max)) {
                return None;
            }

            let range = format!("{} - {}", min, max);
            Some(CompatibleVersionEntry {
                plugin_version: record.version.clone(),
                compatibility: record.compatibility.clone().unwrap_or_else(|| range.clone()),
                compatibility_range: range,
                release_date: record.release_date.clone(),
                release_summary: record.release_summary.clone(),
            })
        })
        .collect()
}

/// Assemble the report for one plugin from its acquired records
pub fn build_result(
    plugin: &PluginDescriptor,
    target_version: &str,
    method: FetchMethod,
    records: Vec<RawVersionRecord>,
) -> PluginResult {
    let compatible_versions = compatible_entries(&records, target_version);

    let current = plugin.current_version.trim();
    let compatible = !current.is_empty()
        && compatible_versions
            .iter()
            .any(|e| compare_versions(&e.plugin_version, current) == Ordering::Equal);

    let highest = compatible_versions
        .iter()
        .max_by(|a, b| compare_versions(&a.plugin_version, &b.plugin_version))
        .map(|e| e.plugin_version.clone());
    let lowest = compatible_versions
        .iter()
        .min_by(|a, b| compare_versions(&a.plugin_version, &b.plugin_version))
        .map(|e| e.plugin_version.clone());

    let compatible_version_range = match (&lowest, &highest) {
        (Some(lo), Some(hi)) if compare_versions(lo, hi) == Ordering::Equal => Some(hi.clone()),
        (Some(lo), Some(hi)) => Some(format!("{} - {}", lo, hi)),
        _ => None,
    };

    PluginResult {
        plugin_name: plugin.name.clone(),
        plugin_url: plugin.marketplace_url.clone(),
        current_version: plugin.current_version.clone(),
        target_version: target_version.to_string(),
        fetch_method: Some(method),
        compatible: Some(compatible),
        compatible_versions,
        compatible_version_range,
        recommended_version: highest,
        total_versions_checked: records.len(),
        all_versions: records,
        error: None,
    }
}
