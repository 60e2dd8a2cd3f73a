//! Error handling for the cssg CLI.
//!
//! [`CliError`] is the single error type returned by commands. Library
//! errors from `cssg-config` and `cssg-build` convert into it via `From`, and
//! `main` turns it into a miette report (see [`cli_error_to_miette`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use cssg_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_layout(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating `cssg.toml` failed
    #[error("Configuration error: {0}")]
    Config(#[from] cssg_config::ConfigError),

    /// The site build failed
    #[error("Build error: {0}")]
    Build(#[from] cssg_build::BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a "not found" I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            CliError::Io(io_err) => {
                CliError::Custom(format!("{}: {}", path.as_ref().display(), io_err))
            }
            other => other,
        })
    }
}
