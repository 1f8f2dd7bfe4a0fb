//! Run outcome types surfaced to the host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a run ended.
///
/// Cancellation is cooperative and not a failure, so it gets its own
/// status instead of an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every group was processed.
    Completed,
    /// Cancellation was observed; outputs produced before the stop
    /// remain on disk.
    Cancelled,
}

/// Result of one concatenation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Final status of the run.
    pub status: RunStatus,
    /// Number of groups discovered in the input directory.
    pub groups_total: usize,
    /// Output files written, in the order they were produced.
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    /// True when every discovered group produced an output.
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed && self.outputs.len() == self.groups_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_run_reports_complete() {
        let report = RunReport {
            status: RunStatus::Completed,
            groups_total: 2,
            outputs: vec![PathBuf::from("video1.mp4"), PathBuf::from("video2.mp4")],
        };
        assert!(report.is_complete());
    }

    #[test]
    fn cancelled_run_is_not_complete() {
        let report = RunReport {
            status: RunStatus::Cancelled,
            groups_total: 2,
            outputs: vec![PathBuf::from("video1.mp4")],
        };
        assert!(!report.is_complete());
    }

    #[test]
    fn report_serializes() {
        let report = RunReport {
            status: RunStatus::Completed,
            groups_total: 0,
            outputs: Vec::new(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"Completed\""));
    }
}
