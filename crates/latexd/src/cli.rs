//! CLI argument structure using clap

use clap::{ArgAction, Parser};
use latexd_core::Overrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "latexd")]
#[command(
    version,
    about = "Compile a LaTeX document with latexmk in a throwaway staging directory",
    long_about = None
)]
pub struct Cli {
    /// Main .tex file (the extension may be omitted)
    #[arg(
        value_name = "TEX",
        required_unless_present = "input",
        conflicts_with = "input"
    )]
    pub tex: Option<PathBuf>,

    /// Main .tex file, as an alternative to the positional argument
    #[arg(short, long, value_name = "TEX")]
    pub input: Option<PathBuf>,

    /// Directories of packages, classes, bibliographies, and images to stage
    #[arg(short, long, value_name = "DIR", num_args = 1.., action = ArgAction::Append)]
    pub extras: Vec<PathBuf>,

    /// Separator-delimited directory list; an entry ending in // adds its subdirectories
    #[arg(short = 'E', long, value_name = "SPEC")]
    pub extras_path: Vec<String>,

    /// Copy extras into the staging directory instead of symlinking them
    #[arg(short, long)]
    pub copy_extras: bool,

    /// Where to place the PDF (a file path or an existing directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Open the PDF in the system viewer after a successful build
    #[arg(short, long, visible_alias = "open")]
    pub preview: bool,

    /// latexmk program name or path
    #[arg(long, value_name = "PROGRAM")]
    pub latexmk: Option<String>,

    /// Stop the build after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only show latexmk output when the build fails
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a JSON build report on stdout
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to latexd.toml next to the document)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Arguments passed to latexmk (after --)
    #[arg(last = true, value_name = "LATEXMK_ARGS")]
    pub latexmk_args: Vec<String>,
}

impl Cli {
    /// The document argument, whichever way it was given
    pub fn document(&self) -> Option<&PathBuf> {
        self.tex.as_ref().or(self.input.as_ref())
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            extras: self.extras.clone(),
            extras_paths: self.extras_path.clone(),
            copy_extras: self.copy_extras,
            output: self.output.clone(),
            preview: self.preview,
            program: self.latexmk.clone(),
            driver_args: self.latexmk_args.clone(),
            timeout_secs: self.timeout,
            // JSON output must not be interleaved with driver output
            quiet: self.quiet || self.json,
        }
    }
}
