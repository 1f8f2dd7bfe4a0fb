//! Concat demuxer manifest handling.
//!
//! ffmpeg's concat demuxer reads its inputs from a text file with one
//! `file '<path>'` line per entry. The manifest uses a fixed shared
//! name within a run, so it must be fully written and closed before the
//! tool starts, and removed again on every exit path.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{ConcatError, ConcatResult};

/// Render manifest contents for the given inputs.
///
/// Each line is `file '<path>'`, the format the concat demuxer expects.
pub fn render_manifest(inputs: &[PathBuf]) -> String {
    let mut out = String::new();
    for path in inputs {
        out.push_str(&format!("file '{}'\n", path.display()));
    }
    out
}

/// Scope guard for the manifest file.
///
/// Writing through the guard ensures the file is flushed and closed
/// before the external process is spawned; dropping the guard removes
/// the file whether the run succeeded, failed or was cancelled.
pub struct ManifestGuard {
    path: PathBuf,
}

impl ManifestGuard {
    /// Write the manifest for `inputs` to `path` and return the guard.
    pub async fn write(path: &Path, inputs: &[PathBuf]) -> ConcatResult<Self> {
        let contents = render_manifest(inputs);

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| ConcatError::io("manifest create", e))?;
        file.write_all(contents.as_bytes())
            .await
            .map_err(|e| ConcatError::io("manifest write", e))?;
        file.flush()
            .await
            .map_err(|e| ConcatError::io("manifest flush", e))?;
        // File handle closes here, before any reader is spawned.
        drop(file);

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the manifest on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        // Best effort; a leftover manifest is harmless but untidy.
        let _ = std::fs::remove_file(&self.path);
    }
}
