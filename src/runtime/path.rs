//! Path utility functions for normalization and comparison.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {
                // Skip `.` components
            }
            Component::ParentDir => {
                // Pop the last component if possible
                if !result.pop() {
                    // If we can't pop (e.g., at root), keep the `..`
                    result.push(component);
                }
            }
            _ => {
                result.push(component);
            }
        }
    }
    result
}

/// Check if `path` starts with `prefix` as a literal string, the same way a
/// search-directory candidate is built by appending `/<vendor>/<name>` to the
/// directory. This is a heuristic: `/work` also prefixes `/workspace/...`, and
/// a foreign symlink that happens to resolve inside a configured directory is
/// indistinguishable from one created here.
pub fn has_literal_prefix(path: &Path, prefix: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .starts_with(&*prefix.as_os_str().to_string_lossy())
}

/// Calculate the relative path from a link location to a target, used to
/// store link destinations that survive the tree being moved or cloned to a
/// different absolute root.
///
/// For example, a link at `/project/vendor/acme/widget` pointing to
/// `/work/acme/widget` gets the target `../../../../work/acme/widget`.
///
/// Returns `None` if a relative path cannot be computed (e.g., different
/// drive letters on Windows).
pub fn relative_link_target(from_link: &Path, to_target: &Path) -> Option<PathBuf> {
    let from_dir = from_link.parent()?;
    let result = pathdiff::diff_paths(to_target, from_dir)?;

    // An absolute result means no relative path exists between the two
    // (e.g., different drives on Windows).
    if result.is_absolute() {
        return None;
    }

    Some(result)
}

/// Strip trailing separators by rebuilding the path from its components.
pub(crate) fn trim_trailing_separator(path: &Path) -> PathBuf {
    path.components().collect()
}
