//! Filesystem utilities.

use applog_types::{LogError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the directory holding log files, under the base location.
pub const LOG_DIR_NAME: &str = "logs";

/// Expand path with tilde.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    // Handle tilde expansion
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Turn `path` into an absolute path, expanding `~` and resolving relative
/// paths against the current directory.
pub fn absolute_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = expand_path(path);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(env::current_dir()?.join(path))
}

/// Directory containing the running executable.
pub fn install_dir() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        LogError::Validation(format!(
            "Cannot determine install directory from executable path: {}",
            exe.display()
        ))
    })
}

/// Create `<base>/logs` (and any missing parents) and return its path.
///
/// Calling this again for the same base is a no-op.
///
/// # Errors
///
/// Returns [`LogError::DirectoryCreation`] when the directory cannot be
/// created, e.g. because a parent is not writable or is a regular file.
pub fn ensure_log_directory(base: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = absolute_path(base)?.join(LOG_DIR_NAME);
    create_dir(&dir)?;
    Ok(dir)
}

/// `create_dir_all` reporting failures as [`LogError::DirectoryCreation`].
pub fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| LogError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_log_directory_is_idempotent() {
        let base = tempfile::tempdir().unwrap();

        let first = ensure_log_directory(base.path()).unwrap();
        assert_eq!(first, base.path().join("logs"));
        assert!(first.is_dir());

        let second = ensure_log_directory(base.path()).unwrap();
        assert_eq!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn test_ensure_log_directory_creates_parents() {
        let base = tempfile::tempdir().unwrap();
        let nested = base.path().join("a").join("b");

        let dir = ensure_log_directory(&nested).unwrap();
        assert!(dir.is_dir());
        assert!(dir.starts_with(&nested));
    }

    #[test]
    fn test_ensure_log_directory_fails_under_a_file() {
        let base = tempfile::tempdir().unwrap();
        let blocker = base.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        match ensure_log_directory(&blocker) {
            Err(LogError::DirectoryCreation { path, .. }) => {
                assert_eq!(path, blocker.join("logs"));
            }
            other => panic!("expected DirectoryCreation, got {:?}", other),
        }
    }

    #[test]
    fn test_absolute_path_resolves_relative() {
        let resolved = absolute_path("some/where").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/where"));
    }

    #[test]
    fn test_install_dir_exists() {
        assert!(install_dir().unwrap().is_dir());
    }
}
