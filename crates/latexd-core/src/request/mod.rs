//! Build request resolution
//!
//! Turns the raw document argument, the optional config file, and command-line
//! overrides into an immutable [`BuildRequest`]. All validation happens here so
//! that nothing is staged for a request that cannot be built.

pub mod document;
pub mod pathspec;

pub use document::{resolve_document, resolve_extra_dir};

use crate::config::Config;
use crate::error::{LatexdError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How source entries are placed into the staging directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMode {
    Link,
    Copy,
}

/// Values supplied on the command line, layered over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub extras: Vec<PathBuf>,
    pub extras_paths: Vec<String>,
    pub copy_extras: bool,
    pub output: Option<PathBuf>,
    pub preview: bool,
    pub program: Option<String>,
    pub driver_args: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub quiet: bool,
}

/// Fully resolved, immutable description of one build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Canonical path of the main `.tex` file
    pub document: PathBuf,
    /// Source directories in staging order; the document's directory is first
    pub sources: Vec<PathBuf>,
    pub mode: StageMode,
    /// Final location of the PDF
    pub output: PathBuf,
    pub preview: bool,
    pub program: String,
    pub driver_args: Vec<String>,
    pub timeout: Option<Duration>,
    pub quiet: bool,
}

impl BuildRequest {
    /// Merge config and overrides for an already resolved document
    ///
    /// Config extras come before command-line extras, so the latter win name
    /// collisions. Path-spec directories are appended last.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an explicit auxiliary directory is missing or
    /// not a directory
    pub fn resolve(document: PathBuf, config: &Config, overrides: Overrides) -> Result<Self> {
        let doc_dir = document
            .parent()
            .ok_or_else(|| {
                LatexdError::InvalidInput(format!(
                    "document '{}' has no parent directory",
                    document.display()
                ))
            })?
            .to_path_buf();

        let mut sources = vec![doc_dir];

        for extra in config.build.extras.iter().chain(overrides.extras.iter()) {
            push_unique(&mut sources, resolve_extra_dir(extra)?);
        }

        for spec in &overrides.extras_paths {
            for dir in pathspec::parse_path_spec(spec) {
                match dir.canonicalize() {
                    Ok(dir) => push_unique(&mut sources, dir),
                    Err(e) => log::warn!("skipping '{}': {}", dir.display(), e),
                }
            }
        }

        let mode = if overrides.copy_extras || config.build.copy_extras {
            StageMode::Copy
        } else {
            StageMode::Link
        };

        let output = resolve_output(&document, overrides.output.as_deref())?;

        let mut driver_args = config.latexmk.args.clone();
        driver_args.extend(overrides.driver_args);

        Ok(Self {
            sources,
            mode,
            output,
            preview: overrides.preview || config.output.preview,
            program: overrides
                .program
                .unwrap_or_else(|| config.latexmk.program.clone()),
            driver_args,
            timeout: overrides
                .timeout_secs
                .or(config.build.timeout_secs)
                .map(Duration::from_secs),
            quiet: overrides.quiet,
            document,
        })
    }

    /// File name of the document inside the staging directory
    pub fn document_name(&self) -> String {
        self.document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Document file name without its `.tex` extension
    pub fn job_name(&self) -> String {
        job_name(&self.document)
    }
}

pub(crate) fn job_name(document: &Path) -> String {
    document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where the PDF ends up: beside the document by default, inside `output`
/// when it is an existing directory, or at `output` itself otherwise
fn resolve_output(document: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let pdf_name = format!("{}.pdf", job_name(document));

    let Some(output) = output else {
        return Ok(document.with_file_name(pdf_name));
    };

    let output = std::path::absolute(output).map_err(|e| {
        LatexdError::InvalidInput(format!("cannot resolve '{}': {}", output.display(), e))
    })?;

    if output.is_dir() {
        Ok(output.join(pdf_name))
    } else {
        Ok(output)
    }
}

fn push_unique(sources: &mut Vec<PathBuf>, dir: PathBuf) {
    if !sources.contains(&dir) {
        sources.push(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        document: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let doc_dir = temp.path().join("paper");
        fs::create_dir(&doc_dir).unwrap();
        fs::write(doc_dir.join("main.tex"), "").unwrap();
        let document = resolve_document(&doc_dir.join("main.tex")).unwrap();
        Fixture { temp, document }
    }

    fn mkdir(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    #[test]
    fn test_document_directory_is_always_first_source() {
        let fx = fixture();
        let request =
            BuildRequest::resolve(fx.document.clone(), &Config::default(), Overrides::default())
                .unwrap();

        assert_eq!(request.sources, vec![fx.document.parent().unwrap().to_path_buf()]);
        assert_eq!(request.mode, StageMode::Link);
        assert_eq!(request.output, fx.document.with_extension("pdf"));
        assert_eq!(request.program, "latexmk");
        assert_eq!(request.document_name(), "main.tex");
        assert_eq!(request.job_name(), "main");
    }

    #[test]
    fn test_extras_keep_order_and_deduplicate() {
        let fx = fixture();
        let a = mkdir(&fx.temp, "a");
        let b = mkdir(&fx.temp, "b");
        let doc_dir = fx.document.parent().unwrap().to_path_buf();

        let overrides = Overrides {
            extras: vec![a.clone(), b.clone(), a.clone(), doc_dir.clone()],
            ..Overrides::default()
        };
        let request = BuildRequest::resolve(fx.document, &Config::default(), overrides).unwrap();

        assert_eq!(request.sources, vec![doc_dir, a, b]);
    }

    #[test]
    fn test_config_extras_precede_cli_extras() {
        let fx = fixture();
        let from_config = mkdir(&fx.temp, "config-styles");
        let from_cli = mkdir(&fx.temp, "cli-styles");

        let mut config = Config::default();
        config.build.extras = vec![from_config.clone()];
        config.latexmk.args = vec!["-xelatex".to_string()];
        config.build.timeout_secs = Some(30);

        let overrides = Overrides {
            extras: vec![from_cli.clone()],
            driver_args: vec!["-shell-escape".to_string()],
            timeout_secs: Some(5),
            ..Overrides::default()
        };
        let request = BuildRequest::resolve(fx.document, &config, overrides).unwrap();

        assert_eq!(&request.sources[1..], &[from_config, from_cli]);
        assert_eq!(request.driver_args, vec!["-xelatex", "-shell-escape"]);
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_extra_is_invalid_input() {
        let fx = fixture();
        let overrides = Overrides {
            extras: vec![fx.temp.path().join("does-not-exist")],
            ..Overrides::default()
        };

        let err = BuildRequest::resolve(fx.document, &Config::default(), overrides).unwrap_err();
        assert!(matches!(err, LatexdError::InvalidInput(_)));
    }

    #[test]
    fn test_copy_mode_from_config_or_flag() {
        let fx = fixture();
        let mut config = Config::default();
        config.build.copy_extras = true;

        let request =
            BuildRequest::resolve(fx.document.clone(), &config, Overrides::default()).unwrap();
        assert_eq!(request.mode, StageMode::Copy);

        let overrides = Overrides {
            copy_extras: true,
            ..Overrides::default()
        };
        let request = BuildRequest::resolve(fx.document, &Config::default(), overrides).unwrap();
        assert_eq!(request.mode, StageMode::Copy);
    }

    #[test]
    fn test_output_directory_receives_job_named_pdf() {
        let fx = fixture();
        let out = mkdir(&fx.temp, "dist");

        let overrides = Overrides {
            output: Some(out.clone()),
            ..Overrides::default()
        };
        let request = BuildRequest::resolve(fx.document, &Config::default(), overrides).unwrap();
        assert_eq!(request.output, out.join("main.pdf"));
    }

    #[test]
    fn test_output_file_path_is_used_verbatim() {
        let fx = fixture();
        let target = fx.temp.path().join("out/renamed.pdf");

        let overrides = Overrides {
            output: Some(target.clone()),
            ..Overrides::default()
        };
        let request = BuildRequest::resolve(fx.document, &Config::default(), overrides).unwrap();
        assert_eq!(request.output, target);
    }
}
