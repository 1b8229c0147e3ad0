//! Clone URL path normalization.

const GIT_SUFFIX: &str = ".git";

/// Turn a raw clone URL path into a `namespace/.../repo` path.
///
/// Empty segments are dropped (leading, trailing and doubled slashes, and the
/// redundant slash of `host:/path`), then a single exact `.git` suffix is
/// removed. Returns `None` when nothing is left.
pub fn normalize_path(raw: &str) -> Option<String> {
    let joined = raw
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    let normalized = joined.strip_suffix(GIT_SUFFIX).unwrap_or(&joined);
    if normalized.is_empty() || normalized.ends_with('/') {
        return None;
    }
    Some(normalized.to_string())
}
