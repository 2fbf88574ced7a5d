use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatexdError {
    // Resolution errors
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    #[error("CONFIG_INVALID: failed to read {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    // Staging errors
    #[error("STAGING_FAILED: {message}: {source}")]
    StagingError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    // Driver errors
    #[error("COMPILER_NOT_FOUND: '{program}' not found on PATH")]
    CompilerNotFound { program: String },

    #[error("COMPILATION_FAILED: {0}")]
    CompilationFailed(String),

    #[error("ARTIFACT_MISSING: compiler reported success but {} was not produced", expected.display())]
    ArtifactMissing { expected: PathBuf },

    #[error("INTERRUPTED: build cancelled by signal")]
    Interrupted,

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl LatexdError {
    pub fn staging(message: impl Into<String>, source: std::io::Error) -> Self {
        LatexdError::StagingError {
            message: message.into(),
            source,
        }
    }

    /// Process exit code reported for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            LatexdError::InvalidInput(_) => 2,
            LatexdError::StagingError { .. } => 3,
            LatexdError::CompilationFailed(_) => 4,
            LatexdError::ArtifactMissing { .. } => 5,
            LatexdError::CompilerNotFound { .. } => 127,
            LatexdError::Interrupted => 130,
            LatexdError::ConfigInvalid { .. } | LatexdError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, LatexdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let errors = [
            LatexdError::InvalidInput("x".to_string()),
            LatexdError::staging("x", std::io::Error::other("boom")),
            LatexdError::CompilationFailed("x".to_string()),
            LatexdError::ArtifactMissing {
                expected: PathBuf::from("main.pdf"),
            },
            LatexdError::CompilerNotFound {
                program: "latexmk".to_string(),
            },
            LatexdError::Interrupted,
        ];

        let mut codes: Vec<i32> = errors.iter().map(LatexdError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0), "no error may exit with 0");
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len(), "codes should be distinct");
    }

    #[test]
    fn test_display_carries_error_code_prefix() {
        let err = LatexdError::staging(
            "failed to link 'fig.png'",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("STAGING_FAILED:"), "got: {msg}");
        assert!(msg.contains("fig.png"));
        assert!(msg.contains("denied"));
    }
}
