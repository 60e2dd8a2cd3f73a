//! Build pipeline errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// A single page that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: PathBuf,
    pub message: String,
}

impl std::fmt::Display for PageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.page.display(), self.message)
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pages directory not found: {}", .0.display())]
    PagesDirMissing(PathBuf),

    #[error("Failed to process stylesheet {}: {message}", .file.display())]
    Css { file: PathBuf, message: String },

    #[error("Invalid data file {}: {source}", .file.display())]
    Data {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} page(s) failed to render; first: {}", .failures.len(), .failures.first().map(ToString::to_string).unwrap_or_default())]
    Pages { failures: Vec<PageFailure> },
}

/// Attach the offending path to an I/O error.
pub(crate) fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}
