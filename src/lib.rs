//! GoPro Concat Core - segment grouping and lossless concatenation
//!
//! This crate contains all business logic with zero UI dependencies.
//! The host application (GUI or CLI) supplies an input directory, an
//! output directory, a log callback and a cancellation token; the core
//! groups segmented recordings and reassembles each group into one
//! `video{n}.mp4` file.

pub mod classify;
pub mod concat;
pub mod logging;
pub mod models;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
