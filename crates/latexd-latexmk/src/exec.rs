//! Running the driver inside the staging directory

use latexd_core::config::consts::OUTPUT_DIR;
use latexd_core::{LatexdError, Result};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

/// Flags always passed before any user arguments
pub const DEFAULT_FLAGS: &[&str] = &["-pdf", "-halt-on-error", "-interaction=nonstopmode"];

/// Options for executing the driver
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub program: PathBuf,
    pub working_dir: PathBuf,
    /// Document file name, relative to `working_dir`
    pub document: String,
    pub extra_args: Vec<String>,
    pub timeout: Option<Duration>,
    /// Forward output live as it arrives; it is captured either way
    pub forward: bool,
}

/// Result of driver execution
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Full argument list for one driver run
///
/// Outputs go to [`OUTPUT_DIR`] below the working directory, away from staged
/// entries that may be symlinks into the source tree.
pub fn build_args(document: &str, extra_args: &[String]) -> Vec<String> {
    DEFAULT_FLAGS
        .iter()
        .map(|f| f.to_string())
        .chain(std::iter::once(format!("-outdir={OUTPUT_DIR}")))
        .chain(extra_args.iter().cloned())
        .chain(std::iter::once(document.to_string()))
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn forward(self, bytes: &[u8]) {
        // A closed terminal must not abort the build
        let _ = match self {
            Stream::Stdout => io::stdout().lock().write_all(bytes),
            Stream::Stderr => io::stderr().lock().write_all(bytes),
        };
    }
}

enum Outcome {
    Finished(io::Result<(ExitStatus, String, String)>),
    Interrupted,
    TimedOut,
}

/// Run the driver and wait for it
///
/// The run ends early when `shutdown` completes (reported as `Interrupted`)
/// or when the timeout elapses (reported as `CompilationFailed`). In both
/// cases the driver and every engine it started are killed and reaped first:
/// on Unix the driver leads its own process group and the whole group is
/// signalled. A non-zero exit code is not
/// an error here; callers inspect [`ExecResult::exit_code`].
///
/// # Errors
///
/// - `CompilerNotFound` if the program cannot be started because it does not exist
/// - `CompilationFailed` if it cannot be started for another reason, or times out
/// - `Interrupted` if `shutdown` fires first
pub async fn exec_latexmk<F>(options: ExecOptions, shutdown: F) -> Result<ExecResult>
where
    F: Future<Output = ()>,
{
    let args = build_args(&options.document, &options.extra_args);
    let program_name = options.program.display().to_string();
    log::debug!(
        "running {} {} in {}",
        program_name,
        args.join(" "),
        options.working_dir.display()
    );

    let start = Instant::now();
    let mut command = Command::new(&options.program);
    command
        .args(&args)
        .current_dir(&options.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LatexdError::CompilerNotFound {
                program: program_name.clone(),
            },
            _ => LatexdError::CompilationFailed(format!("failed to start {program_name}: {e}")),
        })?;

    let outcome = tokio::select! {
        // An interrupt racing the driver's own exit is still an interrupt
        biased;
        _ = shutdown => Outcome::Interrupted,
        res = wait_capturing(&mut child, options.forward) => Outcome::Finished(res),
        _ = sleep_for(options.timeout) => Outcome::TimedOut,
    };

    match outcome {
        Outcome::Finished(res) => {
            let (status, stdout, stderr) = res?;
            let exit_code = exit_code_of(status);
            let duration_ms = start.elapsed().as_millis() as u64;
            log::debug!("{} exited with {} after {}ms", program_name, exit_code, duration_ms);
            Ok(ExecResult {
                exit_code,
                stdout,
                stderr,
                duration_ms,
            })
        }
        Outcome::Interrupted => {
            log::warn!("interrupted, stopping {}", program_name);
            reap(&mut child).await;
            Err(LatexdError::Interrupted)
        }
        Outcome::TimedOut => {
            reap(&mut child).await;
            let secs = options.timeout.map(|t| t.as_secs()).unwrap_or_default();
            Err(LatexdError::CompilationFailed(format!(
                "{program_name} timed out after {secs}s"
            )))
        }
    }
}

async fn wait_capturing(
    child: &mut Child,
    forward: bool,
) -> io::Result<(ExitStatus, String, String)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("driver stdout not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("driver stderr not captured"))?;

    let (out, err) = tokio::join!(
        pump(stdout, Stream::Stdout, forward),
        pump(stderr, Stream::Stderr, forward)
    );
    let status = child.wait().await?;
    Ok((status, out?, err?))
}

/// Copy `reader` line by line to `stream` while keeping a lossy UTF-8 copy
async fn pump<R>(reader: R, stream: Stream, forward: bool) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut captured = String::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if forward {
            stream.forward(&line);
        }
        captured.push_str(&String::from_utf8_lossy(&line));
    }

    Ok(captured)
}

async fn sleep_for(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Kill the driver's process group, then wait for the driver itself
#[cfg(unix)]
async fn reap(child: &mut Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            log::debug!("could not kill driver process group {}: {}", pid, e);
        }
    }
    if let Err(e) = child.kill().await {
        log::debug!("could not kill driver: {}", e);
    }
}

#[cfg(not(unix))]
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        log::debug!("could not kill driver: {}", e);
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_orders_flags_extras_document() {
        let args = build_args("main.tex", &["-shell-escape".to_string()]);
        assert_eq!(
            args,
            vec![
                "-pdf",
                "-halt-on-error",
                "-interaction=nonstopmode",
                "-outdir=.latexd-out",
                "-shell-escape",
                "main.tex"
            ]
        );
    }

    #[test]
    fn test_build_args_without_extras() {
        let args = build_args("thesis.tex", &[]);
        assert_eq!(args.last().map(String::as_str), Some("thesis.tex"));
        assert_eq!(args.len(), DEFAULT_FLAGS.len() + 2);
        assert!(args.contains(&format!("-outdir={OUTPUT_DIR}")));
    }

    #[test]
    fn test_exec_result_success() {
        let ok = ExecResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 1,
        };
        assert!(ok.success());
        assert!(!ExecResult { exit_code: 2, ..ok }.success());
    }
}
