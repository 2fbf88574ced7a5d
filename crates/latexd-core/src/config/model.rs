use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::consts::DEFAULT_PROGRAM;

/// latexd.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub latexmk: LatexmkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    /// Auxiliary directories, relative to the config file
    #[serde(default)]
    pub extras: Vec<PathBuf>,
    #[serde(default)]
    pub copy_extras: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatexmkConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for LatexmkConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub preview: bool,
}
