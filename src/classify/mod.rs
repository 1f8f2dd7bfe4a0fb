//! File classifier and grouper.
//!
//! Scans a directory (non-recursive) for segmented GoPro recordings and
//! partitions them into groups keyed by the 4-digit session number from
//! the filename. Entries that do not match the naming pattern are
//! skipped silently; they are not an error.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::MediaFile;

/// Segment filename pattern: `G` + marker (`H` chaptered / `X` looping),
/// 2-digit sequence number, 4-digit group number, `.MP4` extension
/// (extension case-insensitive). Example: `GH010042.MP4`.
static SEGMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^G[HX](\d{2})(\d{4})\.(?i:MP4)$").expect("valid segment pattern"));

/// Error from classifying an input directory.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Input directory missing or not a directory.
    #[error("Input directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// Listing the directory failed.
    #[error("Failed to read directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for classify operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Ordered groups of segments, keyed by group id.
///
/// `BTreeMap` iteration yields groups in ascending numeric order, which
/// is the processing and output-numbering order downstream.
pub type Groups = BTreeMap<u16, Vec<MediaFile>>;

/// Scan `input_dir` and partition matching files into ordered groups.
///
/// Read-only with respect to the filesystem. Within each group the
/// files are sorted by ascending sequence number, tie-broken by file
/// name so the result is deterministic regardless of listing order.
pub fn classify(input_dir: &Path) -> ClassifyResult<Groups> {
    if !input_dir.is_dir() {
        return Err(ClassifyError::DirectoryNotFound {
            path: input_dir.display().to_string(),
        });
    }

    let entries = fs::read_dir(input_dir).map_err(|source| ClassifyError::Io {
        path: input_dir.display().to_string(),
        source,
    })?;

    let mut groups: Groups = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|source| ClassifyError::Io {
            path: input_dir.display().to_string(),
            source,
        })?;

        // Directories and other non-file entries never qualify.
        let is_file = entry
            .file_type()
            .map(|kind| kind.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let file_name = entry.file_name();
        let Some(media_file) = parse_segment_name(&file_name.to_string_lossy(), &entry.path())
        else {
            tracing::trace!("Skipping non-segment entry: {:?}", file_name);
            continue;
        };

        groups
            .entry(media_file.group_id)
            .or_default()
            .push(media_file);
    }

    for files in groups.values_mut() {
        files.sort_by(|a, b| {
            a.sequence_number
                .cmp(&b.sequence_number)
                .then_with(|| a.file_name().cmp(&b.file_name()))
        });
    }

    tracing::debug!(
        "Classified {} group(s) in {}",
        groups.len(),
        input_dir.display()
    );

    Ok(groups)
}

/// Parse one directory entry name against the segment pattern.
///
/// Returns `None` for anything that is not a segment file.
fn parse_segment_name(name: &str, path: &Path) -> Option<MediaFile> {
    let caps = SEGMENT_PATTERN.captures(name)?;

    // Two and four digits always fit u8/u16.
    let sequence_number: u8 = caps[1].parse().ok()?;
    let group_id: u16 = caps[2].parse().ok()?;

    MediaFile::new(sequence_number, group_id, path).ok()
}
