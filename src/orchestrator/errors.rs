//! Error types for the concatenation run.
//!
//! Every error here is fatal for the run: there is no retry and no
//! skip-and-continue. Cancellation is not an error - it is reported
//! through `RunStatus::Cancelled` instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::classify::ClassifyError;
use crate::concat::ConcatError;

/// Top-level error for one run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Output directory missing or not a directory.
    #[error("Output directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// Scanning the input directory failed.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Copying a single-file group failed.
    #[error("Failed to copy {src} to {dest}: {source}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external concatenation capability failed.
    #[error(transparent)]
    Concat(#[from] ConcatError),
}

impl RunError {
    /// Create a directory-not-found error.
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    /// Create a copy error.
    pub fn copy(src: PathBuf, dest: PathBuf, source: io::Error) -> Self {
        Self::Copy { src, dest, source }
    }
}

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;
