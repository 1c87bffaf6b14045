use std::path::{Path, PathBuf};

use tracing::warn;

use crate::common::{is_within, normalize_lexically};
use crate::domains::advisory::error::{AdvisoryError, AdvisoryResult};
use crate::kernel::ServerDeps;

/// A file served back to the caller.
#[derive(Debug, Clone)]
pub struct RetrievedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Resolve `requested` to a real file inside `root`.
///
/// The path is first normalised lexically and checked against the root, then
/// canonicalised (following symlinks) and checked again, so neither `..`
/// segments nor links can escape.
pub async fn resolve_document_path(root: &Path, requested: &str) -> AdvisoryResult<PathBuf> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(AdvisoryError::MissingInput { name: "path" });
    }

    let lexical_root = normalize_lexically(&absolute(root));
    let canonical_root = tokio::fs::canonicalize(root)
        .await
        .unwrap_or_else(|_| lexical_root.clone());

    let candidate = Path::new(requested);
    let candidate = if candidate.is_absolute() {
        normalize_lexically(candidate)
    } else {
        normalize_lexically(&canonical_root.join(candidate))
    };

    let denied = || AdvisoryError::OutsideRoot {
        path: requested.to_string(),
    };

    if !is_within(&candidate, &lexical_root) && !is_within(&candidate, &canonical_root) {
        warn!(path = %requested, "Rejected path outside documents root");
        return Err(denied());
    }

    let resolved = tokio::fs::canonicalize(&candidate)
        .await
        .map_err(|_| AdvisoryError::FileNotFound {
            path: requested.to_string(),
        })?;

    if !is_within(&resolved, &canonical_root) {
        warn!(path = %requested, resolved = %resolved.display(), "Rejected link escaping documents root");
        return Err(denied());
    }

    if !resolved.is_file() {
        return Err(AdvisoryError::FileNotFound {
            path: requested.to_string(),
        });
    }

    Ok(resolved)
}

/// Read a document from the documents folder for inline viewing.
pub async fn read_document(deps: &ServerDeps, requested: Option<&str>) -> AdvisoryResult<RetrievedFile> {
    let requested = requested.ok_or(AdvisoryError::MissingInput { name: "path" })?;
    let path = resolve_document_path(&deps.folders.documents, requested).await?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AdvisoryError::FileNotFound {
            path: requested.to_string(),
        })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    Ok(RetrievedFile { filename, bytes })
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_inside_root_resolves() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let resolved = resolve_document_path(root.path(), file.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(resolved, std::fs::canonicalize(&file).unwrap());

        let relative = resolve_document_path(root.path(), "a.pdf").await.unwrap();
        assert_eq!(relative, resolved);
    }

    #[tokio::test]
    async fn test_parent_segments_cannot_escape() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("docs");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(base.path().join("outside.pdf"), b"%PDF").unwrap();

        let sneaky = format!("{}/../outside.pdf", root.display());
        let err = resolve_document_path(&root, &sneaky).await.unwrap_err();
        assert!(matches!(err, AdvisoryError::OutsideRoot { .. }));

        let err = resolve_document_path(&root, "/etc/passwd").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::OutsideRoot { .. }));
    }

    #[tokio::test]
    async fn test_sibling_with_common_prefix_is_outside() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("docs");
        let sibling = base.path().join("docs-old");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&sibling).unwrap();
        std::fs::write(sibling.join("a.pdf"), b"%PDF").unwrap();

        let err = resolve_document_path(&root, sibling.join("a.pdf").to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::OutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escaping_root_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("docs");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(base.path().join("secret.pdf"), b"%PDF").unwrap();
        std::os::unix::fs::symlink(base.path().join("secret.pdf"), root.join("link.pdf")).unwrap();

        let err = resolve_document_path(&root, root.join("link.pdf").to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::OutsideRoot { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_and_blank_path() {
        let root = tempfile::tempdir().unwrap();

        let err = resolve_document_path(root.path(), "nope.pdf").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::FileNotFound { .. }));

        let err = resolve_document_path(root.path(), "  ").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingInput { name: "path" }));
    }
}
