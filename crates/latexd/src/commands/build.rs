//! Build command - stage sources, run latexmk, and place the PDF

use crate::cli::Cli;
use crate::output::{BuildReport, print_captured, print_json};
use crate::signal::Shutdown;
use anyhow::Result;
use colored::Colorize;
use latexd_core::artifact::{locate_artifact, place_artifact};
use latexd_core::config::Config;
use latexd_core::request::resolve_document;
use latexd_core::stage::stage_request;
use latexd_core::viewer::{Viewer, preview};
use latexd_core::{BuildRequest, LatexdError, StagingDir};
use latexd_latexmk::{ExecOptions, exec_latexmk, query_version, resolve_latexmk};

/// Progress lines for `--verbose`; kept off stdout when it carries JSON
struct Progress {
    verbose: bool,
    json: bool,
}

impl Progress {
    fn step(&self, msg: impl std::fmt::Display) {
        if !self.verbose {
            return;
        }
        if self.json {
            eprintln!("{} {}", "→".cyan(), msg);
        } else {
            println!("{} {}", "→".cyan(), msg);
        }
    }
}

/// Build one document
///
/// # Arguments
///
/// * `cli` - Parsed command line
/// * `shutdown` - Interrupt listener installed at startup
/// * `viewer` - Viewer used when preview is requested
pub async fn run(cli: Cli, shutdown: &mut Shutdown, viewer: &dyn Viewer) -> Result<()> {
    let progress = Progress {
        verbose: cli.verbose,
        json: cli.json,
    };

    // Step 1: Resolve the document and the request
    let raw = cli
        .document()
        .ok_or_else(|| LatexdError::InvalidInput("no input document given".to_string()))?;
    progress.step(format_args!("Resolving '{}'", raw.display()));

    let document = resolve_document(raw)?;
    let config = Config::discover(&document, cli.config.as_deref())?;
    let request = BuildRequest::resolve(document, &config, cli.overrides())?;

    for source in &request.sources {
        progress.step(format_args!("Source {}", source.display()));
    }

    // Step 2: Find latexmk before touching the filesystem
    let driver = resolve_latexmk(&request.program)?;
    if cli.verbose {
        let version = query_version(&driver.path)
            .map(|v| format!(" {v}"))
            .unwrap_or_default();
        progress.step(format_args!(
            "Using latexmk{} at {} ({})",
            version,
            driver.path.display(),
            driver.source
        ));
    }

    // Step 3: Stage sources
    let mut staging = StagingDir::create()?;
    progress.step(format_args!(
        "Staging {:?} into {}",
        request.mode,
        staging.path().display()
    ));

    let manifest = stage_request(&staging, &request)?;
    for entry in manifest.collisions() {
        progress.step(format_args!(
            "'{}' taken from {}",
            entry.name,
            entry.source.display()
        ));
    }

    // Step 4: Compile
    progress.step(format_args!("Compiling {}", request.document_name()));
    let forward = !request.quiet;
    let result = exec_latexmk(
        ExecOptions {
            program: driver.path.clone(),
            working_dir: staging.path().to_path_buf(),
            document: request.document_name(),
            extra_args: request.driver_args.clone(),
            timeout: request.timeout,
            forward,
        },
        shutdown.recv(),
    )
    .await?;

    if !result.success() {
        eprintln!("{} Build failed", "✗".red().bold());
        if !forward {
            print_captured(&result.stdout, &result.stderr);
        }
        close_staging(&mut staging);
        return Err(LatexdError::CompilationFailed(format!(
            "latexmk exited with code {}",
            result.exit_code
        ))
        .into());
    }

    // Step 5: Collect the PDF
    let artifact = locate_artifact(staging.path(), &request.document)?;
    let pdf = place_artifact(&artifact, &request.output)?;
    close_staging(&mut staging);

    // Step 6: Report
    if cli.json {
        let report = BuildReport {
            document: &request.document,
            pdf: &pdf,
            latexmk: &driver.path,
            mode: request.mode,
            sources: &request.sources,
            staged: &manifest.entries,
            exit_code: result.exit_code,
            duration_ms: result.duration_ms,
        };
        print_json(&serde_json::to_string_pretty(&report)?)?;
    } else {
        println!(
            "{} Built '{}' to {} ({}ms)",
            "✓".green().bold(),
            request.document_name(),
            pdf.display(),
            result.duration_ms
        );
    }

    if request.preview {
        progress.step(format_args!("Opening {}", pdf.display()));
        preview(viewer, &pdf);
    }

    Ok(())
}

/// Remove the staging directory now; a failure here never fails the build
fn close_staging(staging: &mut StagingDir) {
    if let Err(e) = staging.close() {
        log::warn!(
            "failed to remove staging directory {}: {}",
            staging.path().display(),
            e
        );
    }
}
