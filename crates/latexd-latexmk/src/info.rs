use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatexmkSource {
    /// Given as a path on the command line or in the config
    Explicit,
    /// Found by searching PATH
    System,
}

impl fmt::Display for LatexmkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatexmkSource::Explicit => write!(f, "explicit path"),
            LatexmkSource::System => write!(f, "system PATH"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatexmkInfo {
    pub path: PathBuf,
    pub source: LatexmkSource,
}
