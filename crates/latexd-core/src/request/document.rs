use crate::error::{LatexdError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolve the main document argument to an absolute, canonical `.tex` path
///
/// Mirrors shell habits: `paper.` (tab-completed up to the dot) and `paper`
/// both find `paper.tex` when the literal path does not exist.
///
/// # Errors
///
/// Returns `InvalidInput` if the document does not exist or is not a `.tex` file
pub fn resolve_document(raw: &Path) -> Result<PathBuf> {
    let mut path = std::path::absolute(raw).map_err(|e| {
        LatexdError::InvalidInput(format!("cannot resolve '{}': {}", raw.display(), e))
    })?;

    if !path.exists() {
        if let Some(trimmed) = trim_trailing_dots(&path) {
            path = trimmed;
        }
    }

    if !path.exists() && !has_tex_extension(&path) {
        let mut name = path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tex");
        path.set_file_name(name);
    }

    if !path.is_file() {
        return Err(LatexdError::InvalidInput(format!(
            "document '{}' does not exist",
            raw.display()
        )));
    }

    if !has_tex_extension(&path) {
        return Err(LatexdError::InvalidInput(format!(
            "'{}' is not a .tex file",
            raw.display()
        )));
    }

    path.canonicalize().map_err(|e| {
        LatexdError::InvalidInput(format!("cannot resolve '{}': {}", raw.display(), e))
    })
}

/// Resolve an explicitly requested auxiliary directory
///
/// # Errors
///
/// Returns `InvalidInput` if the path does not exist or is not a directory
pub fn resolve_extra_dir(raw: &Path) -> Result<PathBuf> {
    if !raw.exists() {
        return Err(LatexdError::InvalidInput(format!(
            "auxiliary directory '{}' does not exist",
            raw.display()
        )));
    }
    if !raw.is_dir() {
        return Err(LatexdError::InvalidInput(format!(
            "auxiliary path '{}' is not a directory",
            raw.display()
        )));
    }

    raw.canonicalize().map_err(|e| {
        LatexdError::InvalidInput(format!("cannot resolve '{}': {}", raw.display(), e))
    })
}

fn has_tex_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"))
}

fn trim_trailing_dots(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let trimmed = name.trim_end_matches('.');
    if trimmed.len() == name.len() || trimmed.is_empty() {
        return None;
    }
    Some(path.with_file_name(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn doc_in(temp: &TempDir, name: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, "\\documentclass{article}").unwrap();
        path
    }

    #[test]
    fn test_resolves_existing_document_to_canonical_path() {
        let temp = TempDir::new().unwrap();
        let doc = doc_in(&temp, "main.tex");

        let resolved = resolve_document(&doc).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, doc.canonicalize().unwrap());
    }

    #[test]
    fn test_appends_missing_extension() {
        let temp = TempDir::new().unwrap();
        let doc = doc_in(&temp, "paper.tex");

        let resolved = resolve_document(&temp.path().join("paper")).unwrap();
        assert_eq!(resolved, doc.canonicalize().unwrap());
    }

    #[test]
    fn test_strips_trailing_dot() {
        let temp = TempDir::new().unwrap();
        let doc = doc_in(&temp, "paper.tex");

        let resolved = resolve_document(&temp.path().join("paper.")).unwrap();
        assert_eq!(resolved, doc.canonicalize().unwrap());
    }

    #[test]
    fn test_missing_document_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let err = resolve_document(&temp.path().join("missing.tex")).unwrap_err();
        assert!(matches!(err, LatexdError::InvalidInput(_)), "got: {err}");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_non_tex_file_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let notes = doc_in(&temp, "notes.md");

        let err = resolve_document(&notes).unwrap_err();
        assert!(matches!(err, LatexdError::InvalidInput(_)));
        assert!(err.to_string().contains("not a .tex file"));
    }

    #[test]
    fn test_directory_named_like_tex_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("weird.tex")).unwrap();

        let err = resolve_document(&temp.path().join("weird.tex")).unwrap_err();
        assert!(matches!(err, LatexdError::InvalidInput(_)));
    }

    #[test]
    fn test_extra_dir_must_exist_and_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = doc_in(&temp, "file.sty");

        assert!(matches!(
            resolve_extra_dir(&temp.path().join("nope")),
            Err(LatexdError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_extra_dir(&file),
            Err(LatexdError::InvalidInput(_))
        ));
        assert_eq!(
            resolve_extra_dir(temp.path()).unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
