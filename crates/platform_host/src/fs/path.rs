//! Virtual-path resolution helpers shared by the file system and its callers.

/// Resolves `path` against the absolute directory `base`.
///
/// Relative paths are appended to `base` first. `.` segments are dropped, `..` pops the last
/// retained segment (and silently stays at `/` when nothing is left), and empty segments are
/// ignored. The result always starts with `/`. No existence checks are performed.
pub fn resolve_virtual_path(path: &str, base: &str) -> String {
    let joined;
    let full = if path.starts_with('/') {
        path
    } else {
        joined = format!("{base}/{path}");
        joined.as_str()
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in full.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Normalizes a user-entered path against `base`.
///
/// Trims whitespace and converts backslashes to `/` before resolving. File system operations
/// take paths verbatim; only typed input goes through here.
pub fn normalize_virtual_path(path: &str, base: &str) -> String {
    resolve_virtual_path(&path.trim().replace('\\', "/"), base)
}

/// Splits an already-resolved absolute path into `(parent, name)`.
///
/// Returns `None` for the root.
pub fn split_parent(resolved: &str) -> Option<(String, String)> {
    let trimmed = resolved.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    let name = &trimmed[idx + 1..];
    if name.is_empty() {
        return None;
    }
    let parent = if idx == 0 { "/" } else { &trimmed[..idx] };
    Some((parent.to_string(), name.to_string()))
}

/// Returns the path segments of an already-resolved absolute path.
pub fn path_segments(resolved: &str) -> impl Iterator<Item = &str> {
    resolved.split('/').filter(|segment| !segment.is_empty())
}
