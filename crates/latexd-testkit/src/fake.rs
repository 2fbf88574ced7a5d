//! Scripted stand-in for `latexmk`
//!
//! The fake driver is a POSIX shell script. It treats its last argument as
//! the document and, like latexmk, honours `-outdir=<dir>`: the document's
//! bytes are copied to `<outdir>/<stem>.pdf`. It can be told to fail, hang,
//! start a lingering engine process, record what it saw, or report on staged
//! entries.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Builder for a fake `latexmk` script
#[derive(Debug, Clone)]
pub struct FakeLatexmk {
    exit_code: i32,
    produce_pdf: bool,
    record_cwd: Option<PathBuf>,
    record_args: Option<PathBuf>,
    require: Vec<String>,
    inspect: Vec<String>,
    dump: Vec<String>,
    outputs: Vec<(String, String)>,
    engine: Option<(PathBuf, u32)>,
    sleep_secs: Option<u32>,
}

impl Default for FakeLatexmk {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLatexmk {
    pub fn new() -> Self {
        Self {
            exit_code: 0,
            produce_pdf: true,
            record_cwd: None,
            record_args: None,
            require: Vec::new(),
            inspect: Vec::new(),
            dump: Vec::new(),
            outputs: Vec::new(),
            engine: None,
            sleep_secs: None,
        }
    }

    /// Exit with `code` (no PDF is written for non-zero codes)
    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        if code != 0 {
            self.produce_pdf = false;
        }
        self
    }

    /// Exit 0 without writing a PDF
    pub fn without_pdf(mut self) -> Self {
        self.produce_pdf = false;
        self
    }

    /// Write the physical working directory to `file`
    pub fn record_cwd(mut self, file: &Path) -> Self {
        self.record_cwd = Some(file.to_path_buf());
        self
    }

    /// Write every argument, one per line, to `file`
    pub fn record_args(mut self, file: &Path) -> Self {
        self.record_args = Some(file.to_path_buf());
        self
    }

    /// Fail with exit code 12 unless `name` exists in the working directory
    pub fn require(mut self, name: &str) -> Self {
        self.require.push(name.to_string());
        self
    }

    /// Append `name=link|dir|file|missing` to the PDF for a staged entry
    pub fn inspect(mut self, name: &str) -> Self {
        self.inspect.push(name.to_string());
        self
    }

    /// Append the contents of a staged file to the PDF
    pub fn dump(mut self, name: &str) -> Self {
        self.dump.push(name.to_string());
        self
    }

    /// Also write `<outdir>/<stem>.<ext>` with `content`, as an engine writes its auxiliary files
    pub fn output(mut self, ext: &str, content: &str) -> Self {
        self.outputs.push((ext.to_string(), content.to_string()));
        self
    }

    /// Start a background process that writes `marker` after `secs` seconds, then wait for it
    ///
    /// Stands in for the TeX engine latexmk runs as a child.
    pub fn engine(mut self, marker: &Path, secs: u32) -> Self {
        self.engine = Some((marker.to_path_buf(), secs));
        self
    }

    /// Replace the script with `sleep` after recording, so it never finishes on its own
    pub fn hang(mut self, secs: u32) -> Self {
        self.sleep_secs = Some(secs);
        self
    }

    pub fn script(&self) -> String {
        let mut s = String::from("#!/bin/sh\n");
        s.push_str("for last in \"$@\"; do :; done\n");
        s.push_str("stem=\"${last%.tex}\"\n");
        s.push_str("echo \"fake-latexmk: $*\"\n");
        s.push_str("echo \"fake-latexmk: diagnostics for $stem\" >&2\n");
        s.push_str("outdir=.\n");
        s.push_str("for a in \"$@\"; do case \"$a\" in -outdir=*) outdir=\"${a#-outdir=}\";; esac; done\n");
        s.push_str("mkdir -p \"$outdir\"\n");

        if let Some(file) = &self.record_cwd {
            let _ = writeln!(s, "pwd -P > {}", sh_quote(&file.to_string_lossy()));
        }
        if let Some(file) = &self.record_args {
            let _ = writeln!(s, "printf '%s\\n' \"$@\" > {}", sh_quote(&file.to_string_lossy()));
        }
        for name in &self.require {
            let q = sh_quote(name);
            let _ = writeln!(
                s,
                "[ -e {q} ] || {{ echo \"missing {name}\" >&2; exit 12; }}"
            );
        }
        if let Some((marker, secs)) = &self.engine {
            let _ = writeln!(
                s,
                "( sleep {secs}; echo alive > {} ) &\nwait",
                sh_quote(&marker.to_string_lossy())
            );
        }
        if let Some(secs) = self.sleep_secs {
            let _ = writeln!(s, "exec sleep {secs}");
        }
        if self.produce_pdf {
            s.push_str("cat \"$last\" > \"$outdir/$stem.pdf\"\n");
            for (ext, content) in &self.outputs {
                let _ = writeln!(
                    s,
                    "printf '%s\\n' {} > \"$outdir/$stem.{ext}\"",
                    sh_quote(content)
                );
            }
            for name in &self.inspect {
                let q = sh_quote(name);
                let _ = writeln!(
                    s,
                    "if [ -L {q} ]; then echo {k}=link; elif [ -d {q} ]; then echo {k}=dir; \
                     elif [ -f {q} ]; then echo {k}=file; else echo {k}=missing; fi >> \"$outdir/$stem.pdf\"",
                    k = sh_quote(name)
                );
            }
            for name in &self.dump {
                let _ = writeln!(s, "cat {} >> \"$outdir/$stem.pdf\"", sh_quote(name));
            }
        }
        let _ = writeln!(s, "exit {}", self.exit_code);
        s
    }

    /// Write the script as an executable `latexmk` in `dir`
    #[cfg(unix)]
    pub fn install(&self, dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        std::fs::create_dir_all(dir).expect("Failed to create fake driver directory");
        let path = dir.join("latexmk");
        std::fs::write(&path, self.script()).expect("Failed to write fake latexmk");

        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat fake latexmk")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod fake latexmk");
        path
    }
}

fn sh_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "'\\''"))
}
