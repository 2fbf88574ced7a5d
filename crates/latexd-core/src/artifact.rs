//! Locating and placing the compiled PDF

use crate::config::consts::OUTPUT_DIR;
use crate::error::{LatexdError, Result};
use crate::request::job_name;
use std::fs;
use std::path::{Path, PathBuf};

/// Find `<stem>.pdf` for `document` in the staging directory's output directory
///
/// # Errors
///
/// Returns `ArtifactMissing` if the driver did not produce it
pub fn locate_artifact(staging_dir: &Path, document: &Path) -> Result<PathBuf> {
    let expected = staging_dir
        .join(OUTPUT_DIR)
        .join(format!("{}.pdf", job_name(document)));
    if expected.is_file() {
        Ok(expected)
    } else {
        Err(LatexdError::ArtifactMissing { expected })
    }
}

/// Copy the artifact to `dest`, creating parent directories as needed
pub fn place_artifact(artifact: &Path, dest: &Path) -> Result<PathBuf> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(artifact, dest)?;
    log::debug!("copied {} to {}", artifact.display(), dest.display());
    Ok(dest.to_path_buf())
}
