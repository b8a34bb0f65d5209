// Version comparison tolerant of alphanumeric segments

use std::cmp::Ordering;

/// One dot-delimited piece of a version: leading digits plus the rest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSegment {
    pub num: u64,
    pub alpha: String,
}

impl VersionSegment {
    /// Split a segment such as `"10rc1"` into `10` and `"rc1"`
    pub fn parse(segment: &str) -> Self {
        let digits_end = segment
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(segment.len());
        let (digits, rest) = segment.split_at(digits_end);

        // Absurdly long digit runs saturate rather than fail
        let num = if digits.is_empty() {
            0
        } else {
            digits.parse().unwrap_or(u64::MAX)
        };

        Self {
            num,
            alpha: rest.to_lowercase(),
        }
    }
}

impl Ord for VersionSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        // Empty remainder sorts before any non-empty one ("8" < "8a"), which
        // plain string ordering already gives us.
        self.num
            .cmp(&other.num)
            .then_with(|| self.alpha.cmp(&other.alpha))
    }
}

impl PartialOrd for VersionSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A version string split on `.`; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    segments: Vec<VersionSegment>,
}

impl ParsedVersion {
    pub fn parse(version: &str) -> Self {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Self {
                segments: vec![VersionSegment::default()],
            };
        }

        Self {
            segments: trimmed.split('.').map(VersionSegment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[VersionSegment] {
        &self.segments
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let pad = VersionSegment::default();
        let len = self.segments.len().max(other.segments.len());

        for i in 0..len {
            let a = self.segments.get(i).unwrap_or(&pad);
            let b = other.segments.get(i).unwrap_or(&pad);
            match a.cmp(b) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }

        Ordering::Equal
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings
///
/// Segments compare numerically, then by their lowercase alphabetic tail.
/// The shorter version is padded with zero segments, so `"2.0.0"` equals `"2.0"`.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use dccompat::version::compare_versions;
///
/// assert_eq!(compare_versions("8.1", "8.10"), Ordering::Less);
/// assert_eq!(compare_versions("8", "8a"), Ordering::Less);
/// assert_eq!(compare_versions("2.0.0", "2.0"), Ordering::Equal);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    ParsedVersion::parse(a).cmp(&ParsedVersion::parse(b))
}

/// Check whether `target` lies within `[min, max]` inclusive
///
/// Any missing or blank input makes the answer `false`.
pub fn is_version_in_range(target: &str, min: Option<&str>, max: Option<&str>) -> bool {
    let (Some(min), Some(max)) = (min, max) else {
        return false;
    };
    if target.trim().is_empty() || min.trim().is_empty() || max.trim().is_empty() {
        return false;
    }

    compare_versions(target, min) != Ordering::Less
        && compare_versions(target, max) != Ordering::Greater
}

/// Trim a version label and drop a `v`/`V` prefix in front of a digit
///
/// Every source records versions through this so `"v10.0.0"` sorts as `10.0.0`.
pub fn normalize_version_label(label: &str) -> &str {
    let label = label.trim();
    match label.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => label,
    }
}
