//! Staging directory assembly
//!
//! Every top-level entry of every source directory is placed into one flat
//! staging directory, by symlink or by copy. When a name occurs in more than
//! one source the last source wins; the document's own directory is always
//! first and therefore has the lowest precedence. The main document itself
//! is never shadowed.

mod guard;
mod manifest;

pub use guard::StagingDir;
pub use manifest::{EntryKind, StageManifest, StageMethod, StagedEntry};

use crate::config::consts::{GENERATED_EXTENSIONS, IGNORED_NAMES};
use crate::error::{LatexdError, Result};
use crate::request::{BuildRequest, StageMode, job_name};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

struct Candidate {
    source: PathBuf,
    kind: EntryKind,
}

/// Populate `staging` for a resolved request
pub fn stage_request(staging: &StagingDir, request: &BuildRequest) -> Result<StageManifest> {
    stage_sources(
        staging.path(),
        &request.document,
        &request.sources,
        request.mode,
    )
}

/// Populate `staging_dir` from `sources` in order
///
/// # Arguments
///
/// * `staging_dir` - Empty directory to populate
/// * `document` - Main document; its name is reserved for the copy in its own directory
/// * `sources` - Source directories, lowest precedence first
/// * `mode` - Link or copy
///
/// # Errors
///
/// Returns `StagingError` if a source cannot be read or an entry cannot be
/// linked or copied. The caller owns cleanup of `staging_dir`.
pub fn stage_sources(
    staging_dir: &Path,
    document: &Path,
    sources: &[PathBuf],
    mode: StageMode,
) -> Result<StageManifest> {
    let plan = plan_entries(staging_dir, document, sources)?;
    let mut manifest = StageManifest::default();

    for (name, mut candidates) in plan {
        let Some(winner) = candidates.pop() else {
            continue;
        };
        let display_name = name.to_string_lossy().into_owned();
        let overridden: Vec<PathBuf> = candidates.into_iter().map(|c| c.source).collect();

        if !overridden.is_empty() {
            log::warn!(
                "duplicate name '{}' in multiple source directories; using {}",
                display_name,
                winner.source.display()
            );
            for lost in &overridden {
                log::warn!("  - ignored {}", lost.display());
            }
        }

        let dest = staging_dir.join(&name);
        let method = place(&winner, &dest, mode)?;
        log::debug!(
            "staged {} ({:?}, {:?}) from {}",
            display_name,
            winner.kind,
            method,
            winner.source.display()
        );

        manifest.entries.push(StagedEntry {
            name: display_name,
            source: winner.source,
            kind: winner.kind,
            method,
            overridden,
        });
    }

    log::info!(
        "staged {} entries from {} source directories",
        manifest.len(),
        sources.len()
    );
    Ok(manifest)
}

/// Collect candidates per name, in source order
///
/// An entry that is, or contains, the staging directory itself is skipped;
/// this happens when a source directory is the system temp directory.
fn plan_entries(
    staging_dir: &Path,
    document: &Path,
    sources: &[PathBuf],
) -> Result<BTreeMap<OsString, Vec<Candidate>>> {
    let staging_real = staging_dir.canonicalize().map_err(|e| {
        LatexdError::staging(
            format!("failed to resolve '{}'", staging_dir.display()),
            e,
        )
    })?;
    let doc_name = document.file_name();
    let doc_dir = document.parent();
    let job = job_name(document);
    let generated: HashSet<OsString> = GENERATED_EXTENSIONS
        .iter()
        .map(|ext| OsString::from(format!("{job}.{ext}")))
        .collect();

    let mut plan: BTreeMap<OsString, Vec<Candidate>> = BTreeMap::new();

    for dir in sources {
        let mut entries = fs::read_dir(dir)
            .and_then(|it| it.collect::<io::Result<Vec<_>>>())
            .map_err(|e| {
                LatexdError::staging(format!("failed to read '{}'", dir.display()), e)
            })?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name();
            let path = entry.path();

            if name.to_str().is_some_and(|n| IGNORED_NAMES.contains(&n)) {
                continue;
            }
            if generated.contains(&name) {
                log::debug!("not staging build output {}", path.display());
                continue;
            }
            if doc_name == Some(name.as_os_str()) && doc_dir != Some(dir.as_path()) {
                log::warn!(
                    "ignoring {}: it would shadow the main document",
                    path.display()
                );
                continue;
            }

            if path
                .canonicalize()
                .is_ok_and(|real| staging_real.starts_with(&real))
            {
                log::debug!("not staging {}: it holds the staging directory", path.display());
                continue;
            }

            let kind = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(_) => {
                    log::debug!("skipping special file {}", path.display());
                    continue;
                }
                Err(e) => {
                    log::warn!("skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            };

            plan.entry(name).or_default().push(Candidate { source: path, kind });
        }
    }

    Ok(plan)
}

fn place(candidate: &Candidate, dest: &Path, mode: StageMode) -> Result<StageMethod> {
    match mode {
        StageMode::Link => match symlink(&candidate.source, dest, candidate.kind) {
            Ok(()) => Ok(StageMethod::Linked),
            #[cfg(windows)]
            Err(e) => {
                // Symlinks need developer mode or elevation on Windows
                log::warn!(
                    "cannot symlink {} ({}); copying instead",
                    candidate.source.display(),
                    e
                );
                copy_entry(&candidate.source, dest, candidate.kind).map_err(|e| {
                    LatexdError::staging(
                        format!("failed to copy '{}'", candidate.source.display()),
                        e,
                    )
                })?;
                Ok(StageMethod::Copied)
            }
            #[cfg(not(windows))]
            Err(e) => Err(LatexdError::staging(
                format!("failed to link '{}'", candidate.source.display()),
                e,
            )),
        },
        StageMode::Copy => {
            copy_entry(&candidate.source, dest, candidate.kind).map_err(|e| {
                LatexdError::staging(
                    format!("failed to copy '{}'", candidate.source.display()),
                    e,
                )
            })?;
            Ok(StageMethod::Copied)
        }
    }
}

#[cfg(unix)]
fn symlink(source: &Path, dest: &Path, _kind: EntryKind) -> io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn symlink(source: &Path, dest: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => std::os::windows::fs::symlink_file(source, dest),
        EntryKind::Directory => std::os::windows::fs::symlink_dir(source, dest),
    }
}

#[cfg(not(any(unix, windows)))]
fn symlink(_source: &Path, _dest: &Path, _kind: EntryKind) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

/// Physical copy; directories are copied recursively, following symlinks
fn copy_entry(source: &Path, dest: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => fs::copy(source, dest).map(|_| ()),
        EntryKind::Directory => {
            for entry in WalkDir::new(source).follow_links(true) {
                let entry = entry?;
                let rel = entry
                    .path()
                    .strip_prefix(source)
                    .map_err(io::Error::other)?;
                let target = dest.join(rel);

                if entry.file_type().is_dir() {
                    fs::create_dir_all(&target)?;
                } else if entry.file_type().is_file() {
                    fs::copy(entry.path(), &target)?;
                }
            }
            Ok(())
        }
    }
}
