//! Defaults shared by the config layer and the CLI

/// Config file looked up next to the main document
pub const CONFIG_FILE_NAME: &str = "latexd.toml";

/// Compilation driver used when neither the CLI nor the config names one
pub const DEFAULT_PROGRAM: &str = "latexmk";

/// Staging directory name prefix under the system temp directory
pub const STAGING_PREFIX: &str = "latexd-";

/// Directory inside the staging directory that receives every driver output
///
/// Outputs never land next to staged entries, so a symlink into the source
/// tree is never written through.
pub const OUTPUT_DIR: &str = ".latexd-out";

/// Stale driver outputs for the document's job, never staged from a source directory
pub const GENERATED_EXTENSIONS: &[&str] = &[
    "pdf",
    "aux",
    "log",
    "fls",
    "fdb_latexmk",
    "out",
    "xdv",
    "dvi",
    "synctex.gz",
    "bbl",
    "blg",
    "bcf",
    "run.xml",
    "toc",
    "lof",
    "lot",
    "nav",
    "snm",
    "vrb",
    "idx",
    "ind",
    "ilg",
    "glo",
    "gls",
];

/// Version control metadata and output directories left behind by an earlier run
pub const IGNORED_NAMES: &[&str] = &[".git", ".hg", ".svn", OUTPUT_DIR];
