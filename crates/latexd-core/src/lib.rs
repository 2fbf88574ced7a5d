//! Core of latexd: request resolution, staging, and artifact handling.
//!
//! A build flows through the modules in order:
//!
//! ```text
//! request::resolve_document + config::Config::discover
//!     ↓
//! request::BuildRequest::resolve      (all validation, nothing on disk yet)
//!     ↓
//! stage::StagingDir::create + stage::stage_request
//!     ↓
//! (driver runs in the staging directory, see latexd-latexmk)
//!     ↓
//! artifact::locate_artifact + artifact::place_artifact
//!     ↓
//! viewer::preview (optional), StagingDir::close
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod request;
pub mod stage;
pub mod viewer;

// Re-export commonly used types
pub use error::{LatexdError, Result};
pub use request::{BuildRequest, Overrides, StageMode};
pub use stage::{StageManifest, StagingDir};
