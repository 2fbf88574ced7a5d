//! RAII guard for the staging directory

use crate::config::consts::STAGING_PREFIX;
use crate::error::{LatexdError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Process-owned temporary build directory
///
/// The directory is removed when the guard is dropped, which covers early
/// returns and unwinding. [`StagingDir::close`] removes it eagerly and reports
/// failures; calling it more than once, or dropping afterwards, is a no-op.
///
/// Removal never follows symlinks, so linked source files are untouched.
#[derive(Debug)]
pub struct StagingDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl StagingDir {
    /// Create a uniquely named directory under the system temp directory
    ///
    /// # Errors
    ///
    /// Returns `StagingError` if the directory cannot be created
    pub fn create() -> Result<Self> {
        Self::from_builder(None)
    }

    /// Create a uniquely named directory under `base`
    pub fn create_in(base: &Path) -> Result<Self> {
        Self::from_builder(Some(base))
    }

    fn from_builder(base: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);

        let dir = match base {
            Some(base) => builder.tempdir_in(base),
            None => builder.tempdir(),
        }
        .map_err(|e| LatexdError::staging("failed to create staging directory", e))?;

        let path = dir.path().to_path_buf();
        log::debug!("created staging directory {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory has not been removed yet
    pub fn is_open(&self) -> bool {
        self.dir.is_some()
    }

    /// Remove the directory and everything in it
    ///
    /// # Errors
    ///
    /// Returns `Io` if removal fails; the guard is spent either way
    pub fn close(&mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };

        log::debug!("removing staging directory {}", self.path.display());
        dir.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_create_makes_prefixed_directory() {
        let staging = StagingDir::create().unwrap();
        assert!(staging.path().is_dir());
        assert!(staging
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(STAGING_PREFIX));
    }

    #[test]
    fn test_drop_removes_directory() {
        let path = {
            let staging = StagingDir::create().unwrap();
            fs::write(staging.path().join("main.aux"), "aux").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!path.exists(), "staging dir should be removed on drop");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut staging = StagingDir::create().unwrap();
        let path = staging.path().to_path_buf();

        staging.close().unwrap();
        assert!(!path.exists());
        assert!(!staging.is_open());

        staging.close().unwrap();
        drop(staging);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_base_is_staging_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = StagingDir::create_in(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, LatexdError::StagingError { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_close_does_not_follow_symlinks() {
        let source = tempfile::TempDir::new().unwrap();
        fs::write(source.path().join("keep.sty"), "keep").unwrap();

        let mut staging = StagingDir::create().unwrap();
        std::os::unix::fs::symlink(source.path(), staging.path().join("linked-dir")).unwrap();
        std::os::unix::fs::symlink(
            source.path().join("keep.sty"),
            staging.path().join("keep.sty"),
        )
        .unwrap();

        staging.close().unwrap();
        assert!(source.path().join("keep.sty").is_file());
    }
}
