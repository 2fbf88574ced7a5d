//! Test utilities for latexd
//!
//! This crate provides shared testing utilities used across the latexd workspace.

pub mod fake;

pub use fake::FakeLatexmk;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// Keeps test fixtures out of the system temp directory, where tests also
/// check that no staging directories are left behind.
///
/// # Panics
///
/// Panics if the directory cannot be created
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Minimal document whose bytes the fake driver copies into the PDF
pub const MINIMAL_DOCUMENT: &str = "\\documentclass{article}\n\\begin{document}\nHello.\n\\end{document}\n";

/// Write `content` to `root/rel`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Names of the entries directly inside `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir(), "Path should be a directory");
    }

    #[test]
    fn test_temp_dir_auto_cleanup() {
        let path = {
            let temp = temp_dir_in_workspace();
            temp.path().to_path_buf()
        };
        assert!(!path.exists(), "Directory should not exist after drop");
    }

    #[test]
    fn test_write_file_creates_parents_and_lists_entries() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "assets/fig.png", "png");
        write_file(temp.path(), "main.tex", MINIMAL_DOCUMENT);

        assert_eq!(dir_entries(temp.path()), vec!["assets", "main.tex"]);
        assert_eq!(dir_entries(&temp.path().join("assets")), vec!["fig.png"]);
    }
}
