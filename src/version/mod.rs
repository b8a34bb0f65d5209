// Version model: comparison and free-text range extraction

pub mod compare;
pub mod compat_string;

pub use compare::{ParsedVersion, VersionSegment, compare_versions, is_version_in_range, normalize_version_label};
pub use compat_string::{CompatRange, parse_compatibility_string};
