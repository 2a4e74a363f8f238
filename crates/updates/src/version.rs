//! Version ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How release tags are compared with the running version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    /// Semantic-version comparison (`0.0.10` is newer than `0.0.9`).
    #[default]
    Semantic,
    /// Plain string comparison. `"0.0.10" < "0.0.9"` under this ordering.
    Lexical,
}

/// Returns true if `remote` is strictly newer than `current`.
pub fn is_newer(remote: &str, current: &str, ordering: VersionOrdering) -> bool {
    match ordering {
        VersionOrdering::Lexical => remote > current,
        VersionOrdering::Semantic => match (parse(remote), parse(current)) {
            (Some(r), Some(c)) => r.cmp_precedence(&c) == Ordering::Greater,
            _ => {
                debug!(remote, current, "non-semver version, comparing as strings");
                remote > current
            }
        },
    }
}

/// Parses a release tag leniently: a leading `v` is dropped and missing
/// minor/patch components are filled with zero.
fn parse(raw: &str) -> Option<semver::Version> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('v')
        .or_else(|| raw.strip_prefix('V'))
        .unwrap_or(raw);

    if let Ok(v) = semver::Version::parse(raw) {
        return Some(v);
    }

    // Split off pre-release/build suffixes before padding the core.
    let suffix_at = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, suffix) = raw.split_at(suffix_at);
    let dots = core.matches('.').count();
    let padded = match dots {
        0 => format!("{core}.0.0{suffix}"),
        1 => format!("{core}.0{suffix}"),
        _ => return None,
    };
    semver::Version::parse(&padded).ok()
}
