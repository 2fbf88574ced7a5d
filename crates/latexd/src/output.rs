use latexd_core::StageMode;
use latexd_core::stage::StagedEntry;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Machine-readable summary of a successful build
#[derive(Debug, Serialize)]
pub struct BuildReport<'a> {
    pub document: &'a Path,
    pub pdf: &'a Path,
    pub latexmk: &'a Path,
    pub mode: StageMode,
    pub sources: &'a [std::path::PathBuf],
    pub staged: &'a [StagedEntry],
    pub exit_code: i32,
    pub duration_ms: u64,
}

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Replay captured driver output after a quiet build failed
pub fn print_captured(stdout: &str, stderr: &str) {
    let mut err = io::stderr().lock();
    if !stdout.is_empty() {
        let _ = write!(err, "Stdout:\n{stdout}");
    }
    if !stderr.is_empty() {
        let _ = write!(err, "Stderr:\n{stderr}");
    }
}
