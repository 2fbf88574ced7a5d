//! `latexmk` resolution and execution for latexd.
//!
//! - [`info`]: where the driver binary came from
//! - [`resolve`]: finding the driver (explicit path or PATH lookup)
//! - [`exec`]: running it in the staging directory with live output forwarding
//!
//! # Example
//!
//! ```no_run
//! use latexd_latexmk::{ExecOptions, exec_latexmk, resolve_latexmk};
//! use std::path::PathBuf;
//!
//! # async fn demo() -> latexd_core::Result<()> {
//! let driver = resolve_latexmk("latexmk")?;
//! let result = exec_latexmk(
//!     ExecOptions {
//!         program: driver.path,
//!         working_dir: PathBuf::from("/tmp/latexd-stage"),
//!         document: "main.tex".to_string(),
//!         extra_args: vec![],
//!         timeout: None,
//!         forward: true,
//!     },
//!     std::future::pending(),
//! )
//! .await?;
//! println!("Exit code: {}", result.exit_code);
//! # Ok(())
//! # }
//! ```

pub mod exec;
pub mod info;
pub mod resolve;

// Re-export commonly used types
pub use exec::{ExecOptions, ExecResult, build_args, exec_latexmk};
pub use info::{LatexmkInfo, LatexmkSource};
pub use resolve::{query_version, resolve_latexmk};
