//! Data models for GoPro Concat.
//!
//! This module contains the core data structures used throughout the crate:
//! - Media structures (discovered segment files)
//! - Run settings (rotate flag, tool path, manifest name)
//! - Run reports (outcome surfaced to the host)

mod media;
mod report;
mod settings;

// Re-export all public types
pub use media::{MediaFile, MediaFileError};
pub use report::{RunReport, RunStatus};
pub use settings::ConcatSettings;
