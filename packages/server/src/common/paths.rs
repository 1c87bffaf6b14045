use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Component-wise containment; `/data/docs-old` is not inside `/data/docs`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}
