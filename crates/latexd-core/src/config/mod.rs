//! Optional per-document configuration (`latexd.toml`)
//!
//! The config file is looked up next to the main document unless an explicit
//! path is given. Command-line values are layered on top by
//! [`crate::request::BuildRequest::resolve`].

pub mod consts;
pub mod model;

pub use model::{BuildConfig, Config, LatexmkConfig, OutputConfig};

use crate::error::{LatexdError, Result};
use crate::request::pathspec::expand_path;
use consts::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

impl Config {
    /// Load a config file, resolving relative `extras` and a relative
    /// `[latexmk] program` path against its directory
    ///
    /// A bare program name such as `latexmk` is left for the PATH lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| LatexdError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|e| LatexdError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.build.extras = config
            .build
            .extras
            .iter()
            .map(|extra| base.join(expand_path(&extra.to_string_lossy())))
            .collect();

        if is_path_like(&config.latexmk.program) {
            let program = expand_path(&config.latexmk.program);
            if program.is_relative() {
                config.latexmk.program = base.join(program).to_string_lossy().into_owned();
            }
        }

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Find the config for a document
    ///
    /// An explicit path must exist. Otherwise `latexd.toml` beside the
    /// document is used when present, and defaults apply when it is not.
    pub fn discover(document: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let Some(dir) = document.parent() else {
            return Ok(Self::default());
        };

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Whether a program string names a path rather than a command to look up on PATH
pub fn is_path_like(program: &str) -> bool {
    program.contains('/') || program.contains(std::path::MAIN_SEPARATOR)
}
