// Identifier extraction and URL normalization for marketplace listings

use crate::constants::{NON_SLUG_SEGMENTS, VERSION_HISTORY_QUERY, VERSION_HISTORY_SEGMENT};
use crate::model::Identifiers;
use log::debug;
use url::Url;

/// Derive the numeric app id and slug from a listing URL
///
/// The segment after `apps` is the id (digits only), the one after that the
/// slug. Anything unparseable yields empty identifiers instead of an error.
///
/// # Examples
/// ```
/// use dccompat::sources::identifiers::extract_addon_identifiers;
///
/// let ids = extract_addon_identifiers("https://marketplace.example.com/apps/1215215/scriptrunner");
/// assert_eq!(ids.id.as_deref(), Some("1215215"));
/// assert_eq!(ids.slug.as_deref(), Some("scriptrunner"));
/// ```
pub fn extract_addon_identifiers(marketplace_url: &str) -> Identifiers {
    let url = match Url::parse(marketplace_url.trim()) {
        Ok(url) => url,
        Err(e) => {
            debug!("Cannot parse marketplace URL '{}': {}", marketplace_url, e);
            return Identifiers::default();
        }
    };

    let Some(segments) = url.path_segments() else {
        return Identifiers::default();
    };
    let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();

    let Some(apps_pos) = segments.iter().position(|s| *s == "apps") else {
        return Identifiers::default();
    };

    let id = segments
        .get(apps_pos + 1)
        .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
        .map(|s| s.to_string());

    let slug = segments
        .get(apps_pos + 2)
        .filter(|s| !NON_SLUG_SEGMENTS.contains(&s.to_lowercase().as_str()))
        .map(|s| s.to_string());

    Identifiers { id, slug }
}

/// Turn a listing URL into its Data Center version history page URL
///
/// Any query or fragment is dropped, a trailing slash is removed, the
/// version-history segment is appended once, and the hosting query is pinned.
pub fn version_history_url(marketplace_url: &str) -> String {
    let trimmed = marketplace_url.trim();

    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            let path = with_history_segment(url.path());
            url.set_path(&path);
            url.set_query(Some(VERSION_HISTORY_QUERY));
            url.to_string()
        }
        Err(_) => {
            // Not a full URL; normalize the text the same way
            let base = trimmed
                .split(['?', '#'])
                .next()
                .unwrap_or(trimmed);
            format!("{}?{}", with_history_segment(base), VERSION_HISTORY_QUERY)
        }
    }
}

fn with_history_segment(path: &str) -> String {
    let path = path.trim_end_matches('/');
    let suffix = format!("/{}", VERSION_HISTORY_SEGMENT);
    if path.ends_with(&suffix) {
        path.to_string()
    } else {
        format!("{}{}", path, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id_and_slug() {
        let ids = extract_addon_identifiers("https://marketplace.example.com/apps/1215215/scriptrunner");
        assert_eq!(ids.id.as_deref(), Some("1215215"));
        assert_eq!(ids.slug.as_deref(), Some("scriptrunner"));
    }

    #[test]
    fn test_extract_without_apps_segment() {
        let ids = extract_addon_identifiers("https://marketplace.example.com/plugins/1215215/scriptrunner");
        assert_eq!(ids, Identifiers::default());
    }

    #[test]
    fn test_extract_malformed_url() {
        assert_eq!(extract_addon_identifiers("not a url"), Identifiers::default());
        assert_eq!(extract_addon_identifiers(""), Identifiers::default());
    }

    #[test]
    fn test_extract_rejects_non_numeric_id() {
        let ids = extract_addon_identifiers("https://marketplace.example.com/apps/draw-io/diagrams");
        assert_eq!(ids.id, None);
        assert_eq!(ids.slug.as_deref(), Some("diagrams"));
    }

    #[test]
    fn test_extract_rejects_keyword_slug() {
        let ids = extract_addon_identifiers(
            "https://marketplace.example.com/apps/1215215/version-history?hosting=datacenter",
        );
        assert_eq!(ids.id.as_deref(), Some("1215215"));
        assert_eq!(ids.slug, None);
    }

    #[test]
    fn test_version_history_url_appends_segment_and_query() {
        assert_eq!(
            version_history_url("https://marketplace.example.com/apps/1215215/scriptrunner/?tab=overview"),
            "https://marketplace.example.com/apps/1215215/scriptrunner/version-history?versionHistoryHosting=dataCenter"
        );
    }

    #[test]
    fn test_version_history_url_is_idempotent() {
        let once = version_history_url("https://marketplace.example.com/apps/1/gliffy");
        assert_eq!(version_history_url(&once), once);
    }

    #[test]
    fn test_version_history_url_without_scheme() {
        assert_eq!(
            version_history_url("marketplace.example.com/apps/1/gliffy/?x=1"),
            "marketplace.example.com/apps/1/gliffy/version-history?versionHistoryHosting=dataCenter"
        );
    }
}
