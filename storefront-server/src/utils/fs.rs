//! Filesystem helpers for upload directories and generated artifacts

use std::io;
use std::path::{Component, Path, PathBuf};

/// Create a directory (and parents) if it does not exist yet
pub async fn ensure_directory(path: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(path).await
}

/// Create every directory in `paths`
pub async fn ensure_directories<P: AsRef<Path>>(paths: &[P]) -> io::Result<()> {
    for path in paths {
        ensure_directory(path.as_ref()).await?;
    }
    Ok(())
}

/// Unlink a file, logging instead of failing
///
/// Returns whether the file was removed.
pub async fn remove_file_best_effort(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove file");
            false
        }
    }
}

/// Join a stored relative path onto `root`
///
/// Returns `None` for absolute paths or paths that climb out of `root`.
pub fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (resolved != root).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_directories_is_recursive_and_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("uploads/invoices");
        let other = tmp.path().join("uploads/products");

        ensure_directories(&[&nested, &other]).await.unwrap();
        ensure_directories(&[&nested, &other]).await.unwrap();

        assert!(nested.is_dir());
        assert!(other.is_dir());
    }

    #[tokio::test]
    async fn test_remove_file_best_effort() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("invoice.pdf");
        tokio::fs::write(&file, b"%PDF").await.unwrap();

        assert!(remove_file_best_effort(&file).await);
        assert!(!file.exists());
        // Missing file is swallowed
        assert!(!remove_file_best_effort(&file).await);
    }

    #[test]
    fn test_resolve_under_stays_inside_root() {
        let root = Path::new("/srv/uploads");
        assert_eq!(
            resolve_under(root, "invoices/INV-2026-ABCDEF.pdf"),
            Some(PathBuf::from("/srv/uploads/invoices/INV-2026-ABCDEF.pdf"))
        );
        assert_eq!(
            resolve_under(root, "./invoices/a.pdf"),
            Some(PathBuf::from("/srv/uploads/invoices/a.pdf"))
        );
        assert_eq!(resolve_under(root, "../etc/passwd"), None);
        assert_eq!(resolve_under(root, "invoices/../../x"), None);
        assert_eq!(resolve_under(root, "/etc/passwd"), None);
        assert_eq!(resolve_under(root, ""), None);
    }
}
