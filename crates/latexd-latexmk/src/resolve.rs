use crate::info::{LatexmkInfo, LatexmkSource};
use latexd_core::config::is_path_like;
use latexd_core::{LatexdError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Locate the compilation driver
///
/// A program containing a path separator is taken as a path (made absolute,
/// since the driver runs inside the staging directory). Anything else is
/// looked up on PATH.
///
/// # Errors
///
/// Returns `CompilerNotFound` if the program cannot be found
pub fn resolve_latexmk(program: &str) -> Result<LatexmkInfo> {
    if is_path_like(program) {
        let path = std::path::absolute(program).map_err(|_| not_found(program))?;
        if !path.is_file() {
            return Err(not_found(program));
        }
        return Ok(LatexmkInfo {
            path,
            source: LatexmkSource::Explicit,
        });
    }

    let path: PathBuf = which::which(program).map_err(|_| not_found(program))?;
    Ok(LatexmkInfo {
        path,
        source: LatexmkSource::System,
    })
}

fn not_found(program: &str) -> LatexdError {
    LatexdError::CompilerNotFound {
        program: program.to_string(),
    }
}

/// Ask the driver for its version, for diagnostics only
pub fn query_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_latexmk_version(&String::from_utf8_lossy(&output.stdout))
}

/// Parse version string from `latexmk --version` output
///
/// Expected format: "Latexmk, John Collins, 31 Jan. 2024. Version 4.83"
fn parse_latexmk_version(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (_, rest) = line.split_once("Version ")?;
        let version = rest.split_whitespace().next()?;
        version
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
            .then(|| version.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latexmk_version() {
        let out = "\nLatexmk, John Collins, 31 Jan. 2024. Version 4.83\n";
        assert_eq!(parse_latexmk_version(out), Some("4.83".to_string()));
    }

    #[test]
    fn test_parse_latexmk_version_rejects_garbage() {
        assert_eq!(parse_latexmk_version(""), None);
        assert_eq!(parse_latexmk_version("Version unknown"), None);
        assert_eq!(parse_latexmk_version("no version here"), None);
    }

    #[test]
    fn test_missing_program_on_path_is_not_found() {
        let err = resolve_latexmk("latexd-definitely-not-a-real-driver").unwrap_err();
        assert!(matches!(err, LatexdError::CompilerNotFound { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        let err = resolve_latexmk("./nowhere/latexmk").unwrap_err();
        assert!(matches!(err, LatexdError::CompilerNotFound { .. }));
    }

    #[test]
    fn test_explicit_relative_path_becomes_absolute() {
        let temp = latexd_testkit::temp_dir_in_workspace();
        let driver = temp.path().join("latexmk");
        std::fs::write(&driver, "").unwrap();

        let cwd = std::env::current_dir().unwrap();
        let rel = driver.strip_prefix(&cwd).unwrap();
        let info = resolve_latexmk(&rel.to_string_lossy()).unwrap();

        assert!(info.path.is_absolute());
        assert_eq!(info.source, LatexmkSource::Explicit);
    }
}
