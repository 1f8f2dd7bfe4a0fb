//! Run settings supplied by the host application.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Shared manifest file name, reused sequentially across invocations
/// within a single run. Never read concurrently because groups are
/// processed one at a time.
pub const DEFAULT_MANIFEST_NAME: &str = "vidlist.txt";

/// Options for one concatenation run.
///
/// In-memory only; nothing here is persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatSettings {
    /// Stamp output video metadata with a 180-degree rotation hint.
    pub rotate: bool,
    /// Path to the external concatenation tool.
    pub tool_path: PathBuf,
    /// Name of the temporary concat manifest file.
    pub manifest_name: String,
}

impl Default for ConcatSettings {
    fn default() -> Self {
        Self {
            rotate: false,
            tool_path: PathBuf::from("ffmpeg"),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }
}

impl ConcatSettings {
    /// Enable or disable the rotation metadata hint.
    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Override the external tool path.
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_path = path.into();
        self
    }
}
