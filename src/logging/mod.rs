//! Progress logging back to the host.
//!
//! The core never touches a UI; it hands each human-readable progress
//! line to a caller-supplied callback. The callback is invoked on the
//! worker context - hosts are responsible for marshalling to their own
//! thread. Each conversion line is emitted before the corresponding
//! output file is produced.

use std::path::Path;

/// Host log callback. Receives each progress line as a string.
pub type LogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Thin logger for one run.
///
/// Formats conversion lines as `"{inputs} => {output}"`, surrounded by
/// line separators, and forwards them to the host callback (if any).
/// Diagnostics additionally go to `tracing`.
#[derive(Default)]
pub struct RunLogger {
    callback: Option<LogCallback>,
}

impl RunLogger {
    /// Create a logger with no host callback (tracing only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logger that forwards lines to `callback`.
    pub fn with_callback(callback: LogCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Emit the conversion line for one group.
    ///
    /// `input` is the joined list of source paths (newline-separated
    /// for multi-file groups).
    pub fn convert(&self, input: &str, output: &Path) {
        tracing::info!("Converting to {}", output.display());
        self.emit(&format!("\n{} => {}\n", input, output.display()));
    }

    /// Emit a raw message to the host.
    pub fn message(&self, message: &str) {
        self.emit(message);
    }

    fn emit(&self, line: &str) {
        if let Some(ref callback) = self.callback {
            callback(line);
        }
    }
}
