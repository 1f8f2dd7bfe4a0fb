//! ffmpeg-backed concatenation.
//!
//! Drives `ffmpeg -f concat` in stream-copy mode, so segments are
//! demux-joined without re-encoding. Cancellation observed while the
//! child is running terminates it forcefully instead of waiting for a
//! graceful exit.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::manifest::ManifestGuard;
use super::{Concatenate, ConcatError, ConcatResult};
use crate::models::ConcatSettings;

/// Concatenator backed by the ffmpeg concat demuxer.
pub struct FfmpegConcatenator {
    /// ffmpeg executable (name or full path).
    tool_path: PathBuf,
    /// Fixed manifest path, shared sequentially across invocations.
    manifest_path: PathBuf,
}

impl FfmpegConcatenator {
    /// Create a concatenator from run settings.
    ///
    /// The manifest lives in the process working directory under the
    /// configured name, matching where the tool is told to read it.
    pub fn new(settings: &ConcatSettings) -> Self {
        Self {
            tool_path: settings.tool_path.clone(),
            manifest_path: PathBuf::from(&settings.manifest_name),
        }
    }

    fn tool_name(&self) -> String {
        self.tool_path.display().to_string()
    }

    /// Build the ffmpeg invocation for one group.
    fn build_command(&self, output: &Path, rotate: bool) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        cmd.arg("-y")
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(&self.manifest_path)
            .args(["-c", "copy"]);
        if rotate {
            cmd.args(["-metadata:s:v:0", "rotate=180"]);
        }
        cmd.arg(output);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl Concatenate for FfmpegConcatenator {
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        rotate: bool,
        cancel: &CancellationToken,
    ) -> ConcatResult<()> {
        // Manifest is fully written and closed before the child spawns,
        // and removed when the guard drops on any exit path.
        let _manifest = ManifestGuard::write(&self.manifest_path, inputs).await?;

        let mut cmd = self.build_command(output, rotate);
        tracing::debug!("Running {}: {:?}", self.tool_name(), cmd);

        let mut child = cmd.spawn().map_err(|source| ConcatError::SpawnFailed {
            tool: self.tool_name(),
            source,
        })?;

        tokio::select! {
            // Prefer the cancel branch so a fired token always wins the
            // race against a fast-exiting child.
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Cancellation requested, killing {}", self.tool_name());
                // Kill, then reap so no zombie outlives the run.
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(ConcatError::Cancelled)
            }
            status = child.wait() => {
                let status = status.map_err(|e| ConcatError::io("wait for child", e))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(ConcatError::CommandFailed {
                        tool: self.tool_name(),
                        exit_code: status.code().unwrap_or(-1),
                    })
                }
            }
        }
    }
}
