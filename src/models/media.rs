//! Media-related data structures (discovered segment files).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a [`MediaFile`] cannot be constructed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MediaFileError {
    /// The source path was empty.
    #[error("media file path must not be empty")]
    EmptyPath,
}

/// One discovered video segment.
///
/// Both numbers are parsed from the filename and never change after
/// construction. `sequence_number` orders the segment within its
/// recording session; `group_id` identifies the session itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Position of this segment within its group (00-99).
    pub sequence_number: u8,
    /// Recording session this segment belongs to (0000-9999).
    pub group_id: u16,
    /// Path to the segment on storage.
    pub source_path: PathBuf,
}

impl MediaFile {
    /// Create a new media file.
    ///
    /// Fails if `source_path` is empty.
    pub fn new(
        sequence_number: u8,
        group_id: u16,
        source_path: impl Into<PathBuf>,
    ) -> Result<Self, MediaFileError> {
        let source_path = source_path.into();
        if source_path.as_os_str().is_empty() {
            return Err(MediaFileError::EmptyPath);
        }
        Ok(Self {
            sequence_number,
            group_id,
            source_path,
        })
    }

    /// File name portion of the source path, lossy-decoded.
    ///
    /// Used as the deterministic tie-break when two segments carry the
    /// same sequence number.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
