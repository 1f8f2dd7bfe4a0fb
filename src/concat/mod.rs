//! External concatenation capability.
//!
//! The orchestrator never spawns processes itself; it delegates to a
//! [`Concatenate`] implementation. The real one ([`FfmpegConcatenator`])
//! drives ffmpeg's concat demuxer; tests inject a fake that records
//! invocations instead.

mod ffmpeg;
mod manifest;

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use ffmpeg::FfmpegConcatenator;
pub use manifest::{render_manifest, ManifestGuard};

/// Error from the concatenation capability.
#[derive(Error, Debug)]
pub enum ConcatError {
    /// File I/O failed (manifest write, output probe).
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// The external tool could not be started.
    #[error("Failed to start {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The external tool exited with a failure status.
    #[error("{tool} failed with exit code {exit_code}")]
    CommandFailed { tool: String, exit_code: i32 },

    /// Cancellation was observed while the tool was running; the child
    /// process has been terminated. Not a failure.
    #[error("Concatenation cancelled")]
    Cancelled,
}

impl ConcatError {
    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for concatenation operations.
pub type ConcatResult<T> = Result<T, ConcatError>;

/// Lossless concatenation of an ordered list of inputs into one output.
///
/// Implementations must stream-copy the encoded media (no transcoding)
/// and honor the cancellation token by terminating any in-flight work.
#[async_trait]
pub trait Concatenate: Send + Sync {
    /// Concatenate `inputs` (already in playback order) into `output`.
    ///
    /// `rotate` requests a 180-degree rotation metadata hint on the
    /// output video stream.
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        rotate: bool,
        cancel: &CancellationToken,
    ) -> ConcatResult<()>;
}
