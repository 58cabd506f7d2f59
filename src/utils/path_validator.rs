use crate::error::{Result, UpdaterError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Resolves the repository directory the updater is allowed to enter.
pub struct PathValidator;

impl PathValidator {
    /// Validates and canonicalises the configured repository path.
    ///
    /// A path that does not exist is reported as [`UpdaterError::PathNotFound`]
    /// so the caller can stop before any subcommand is started.
    pub fn validate_repository_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        // dunce keeps Windows paths free of the \\?\ verbatim prefix
        let canonical = dunce::canonicalize(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => UpdaterError::PathNotFound(path.to_path_buf()),
            _ => UpdaterError::Io(e),
        })?;

        if !canonical.is_dir() {
            return Err(UpdaterError::NotADirectory(canonical));
        }

        Ok(canonical)
    }

    /// Returns true when the directory looks like a Git working copy.
    ///
    /// `.git` may be a file for worktrees and submodules.
    pub fn is_git_working_copy(path: impl AsRef<Path>) -> bool {
        path.as_ref().join(".git").exists()
    }
}
