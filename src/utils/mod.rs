//! Path helpers shared by the enumerator and the extractor

use std::path::{Component, Path, PathBuf};

/// Express `path` relative to `base`.
///
/// `glob` hands back paths spelled the way the pattern was spelled, so a
/// plain `strip_prefix` usually works. When `base` carries `.` components
/// that the match lost (or the other way round) both sides are compared
/// with those components removed.
pub fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(base) {
        return Some(rel.to_path_buf());
    }

    let strip_cur = |p: &Path| -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    strip_cur(path)
        .strip_prefix(strip_cur(base))
        .ok()
        .map(Path::to_path_buf)
}

/// Normalize a relative path into a forward-slash separated string.
///
/// `.` components are dropped and `..` is resolved lexically, like a
/// `normpath`. The result never uses the host separator, so generated output
/// is identical on every platform.
pub fn normalize_relative(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(last) if last != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().replace('\\', "/")),
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Check that a forward-slash resource path stays inside its root when joined.
///
/// Rejects absolute paths, `..` segments and empty paths.
pub fn is_contained_resource_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return false;
    }
    if Path::new(path).is_absolute() {
        return false;
    }
    path.split('/')
        .all(|segment| !segment.is_empty() && segment != "..")
}
