//! Concatenation orchestrator.
//!
//! Drives one run: classify the input directory, then process groups
//! strictly sequentially in ascending group-id order. Each group yields
//! one `video{n}.mp4` in the output directory, where `n` is a purely
//! positional counter starting at 1. Single-file groups are copied
//! byte-for-byte; multi-file groups are delegated to the injected
//! [`Concatenate`] capability.
//!
//! Cancellation is checked before each group starts and, via the
//! capability, while an external process is in flight. Outputs already
//! produced are never rolled back.

mod errors;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::classify::{classify, Groups};
use crate::concat::{Concatenate, ConcatError, FfmpegConcatenator};
use crate::logging::RunLogger;
use crate::models::{ConcatSettings, MediaFile, RunReport, RunStatus};

pub use errors::{RunError, RunResult};

/// Sequential orchestrator for one or more runs.
pub struct Orchestrator {
    concatenator: Arc<dyn Concatenate>,
    settings: ConcatSettings,
    logger: RunLogger,
}

impl Orchestrator {
    /// Create an orchestrator with the real ffmpeg capability.
    pub fn new(settings: ConcatSettings, logger: RunLogger) -> Self {
        let concatenator: Arc<dyn Concatenate> = Arc::new(FfmpegConcatenator::new(&settings));
        Self {
            concatenator,
            settings,
            logger,
        }
    }

    /// Create an orchestrator with an injected capability.
    ///
    /// Lets tests swap in a fake that records invocations instead of
    /// spawning processes.
    pub fn with_concatenator(
        concatenator: Arc<dyn Concatenate>,
        settings: ConcatSettings,
        logger: RunLogger,
    ) -> Self {
        Self {
            concatenator,
            settings,
            logger,
        }
    }

    /// Run one classification + concatenation pass.
    ///
    /// Returns a [`RunReport`] on orderly completion or cancellation;
    /// any other failure aborts the run and propagates unmodified.
    pub async fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        cancel: &CancellationToken,
    ) -> RunResult<RunReport> {
        if !output_dir.is_dir() {
            return Err(RunError::directory_not_found(
                output_dir.display().to_string(),
            ));
        }

        let groups = classify(input_dir)?;
        tracing::info!(
            "Processing {} group(s) from {}",
            groups.len(),
            input_dir.display()
        );

        self.process_groups(&groups, output_dir, cancel).await
    }

    /// Process already-classified groups in ascending group-id order.
    async fn process_groups(
        &self,
        groups: &Groups,
        output_dir: &Path,
        cancel: &CancellationToken,
    ) -> RunResult<RunReport> {
        let mut outputs: Vec<PathBuf> = Vec::new();

        for (n, (group_id, files)) in groups.iter().enumerate() {
            // No new group starts after cancellation.
            if cancel.is_cancelled() {
                tracing::info!("Run cancelled before group {:04}", group_id);
                return Ok(self.report(RunStatus::Cancelled, groups, outputs));
            }

            let output = output_dir.join(format!("video{}.mp4", n + 1));

            if let [file] = files.as_slice() {
                self.copy_single(file, &output).await?;
            } else {
                match self.concat_group(files, &output, cancel).await {
                    Ok(()) => {}
                    Err(ConcatError::Cancelled) => {
                        tracing::info!("Run cancelled during group {:04}", group_id);
                        return Ok(self.report(RunStatus::Cancelled, groups, outputs));
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            tracing::debug!("Group {:04} -> {}", group_id, output.display());
            outputs.push(output);
        }

        Ok(self.report(RunStatus::Completed, groups, outputs))
    }

    /// Copy a lone segment verbatim to its output path.
    async fn copy_single(&self, file: &MediaFile, output: &Path) -> RunResult<()> {
        let src = &file.source_path;
        self.logger.convert(&src.display().to_string(), output);

        tokio::fs::copy(src, output)
            .await
            .map_err(|e| RunError::copy(src.clone(), output.to_path_buf(), e))?;
        Ok(())
    }

    /// Hand a multi-file group to the concatenation capability.
    async fn concat_group(
        &self,
        files: &[MediaFile],
        output: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), ConcatError> {
        let paths: Vec<PathBuf> = files.iter().map(|f| f.source_path.clone()).collect();
        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.logger.convert(&joined, output);

        self.concatenator
            .concatenate(&paths, output, self.settings.rotate, cancel)
            .await
    }

    fn report(&self, status: RunStatus, groups: &Groups, outputs: Vec<PathBuf>) -> RunReport {
        RunReport {
            status,
            groups_total: groups.len(),
            outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    use async_trait::async_trait;
    use crate::concat::ConcatResult;

    /// Records invocations instead of spawning a process.
    #[derive(Default)]
    struct RecordingConcatenator {
        calls: Mutex<Vec<(Vec<PathBuf>, PathBuf, bool)>>,
        fail: bool,
    }

    impl RecordingConcatenator {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<(Vec<PathBuf>, PathBuf, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Concatenate for RecordingConcatenator {
        async fn concatenate(
            &self,
            inputs: &[PathBuf],
            output: &Path,
            rotate: bool,
            cancel: &CancellationToken,
        ) -> ConcatResult<()> {
            if cancel.is_cancelled() {
                return Err(ConcatError::Cancelled);
            }
            self.calls
                .lock()
                .unwrap()
                .push((inputs.to_vec(), output.to_path_buf(), rotate));
            if self.fail {
                return Err(ConcatError::CommandFailed {
                    tool: "fake".to_string(),
                    exit_code: 1,
                });
            }
            // Fake output so completed groups are observable on disk.
            fs::write(output, b"concatenated").unwrap();
            Ok(())
        }
    }

    fn orchestrator(fake: Arc<RecordingConcatenator>) -> Orchestrator {
        Orchestrator::with_concatenator(fake, ConcatSettings::default(), RunLogger::new())
    }

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn missing_output_dir_is_an_error() {
        let input = tempdir().unwrap();
        let orch = orchestrator(Arc::new(RecordingConcatenator::default()));
        let result = orch
            .run(
                input.path(),
                Path::new("/nonexistent/out"),
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(RunError::DirectoryNotFound { .. })));
    }

    #[tokio::test]
    async fn single_file_group_is_copied_byte_identical() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_file(input.path(), "GH010003.MP4", b"lone segment bytes");

        let fake = Arc::new(RecordingConcatenator::default());
        let report = orchestrator(Arc::clone(&fake))
            .run(input.path(), output.path(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.outputs, vec![output.path().join("video1.mp4")]);
        let copied = fs::read(output.path().join("video1.mp4")).unwrap();
        assert_eq!(copied, b"lone segment bytes");
        // Copy path never touches the external capability.
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn example_scenario_produces_expected_outputs() {
        // Groups 0003 (one file) and 0007 (two files).
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_file(input.path(), "GH010007.MP4", b"seg 1 of 7");
        write_file(input.path(), "GH020007.MP4", b"seg 2 of 7");
        write_file(input.path(), "GH010003.MP4", b"only 3");

        let fake = Arc::new(RecordingConcatenator::default());
        let report = orchestrator(Arc::clone(&fake))
            .run(input.path(), output.path(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(
            report.outputs,
            vec![
                output.path().join("video1.mp4"),
                output.path().join("video2.mp4"),
            ]
        );
        // video1 is the copy of the lone group-0003 file.
        assert_eq!(
            fs::read(output.path().join("video1.mp4")).unwrap(),
            b"only 3"
        );

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        let (inputs, out, rotate) = &calls[0];
        assert_eq!(
            *inputs,
            vec![
                input.path().join("GH010007.MP4"),
                input.path().join("GH020007.MP4"),
            ]
        );
        assert_eq!(*out, output.path().join("video2.mp4"));
        assert!(!rotate);
    }

    #[tokio::test]
    async fn rotate_flag_reaches_the_capability() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_file(input.path(), "GH010001.MP4", b"a");
        write_file(input.path(), "GH020001.MP4", b"b");

        let fake = Arc::new(RecordingConcatenator::default());
        let orch = Orchestrator::with_concatenator(
            fake.clone(),
            ConcatSettings::default().with_rotate(true),
            RunLogger::new(),
        );
        orch.run(input.path(), output.path(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(fake.calls()[0].2);
    }

    #[tokio::test]
    async fn cancel_before_start_produces_nothing() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_file(input.path(), "GH010001.MP4", b"a");
        write_file(input.path(), "GH020001.MP4", b"b");

        let cancel = CancellationToken::new();
        cancel.cancel();

        let fake = Arc::new(RecordingConcatenator::default());
        let report = orchestrator(Arc::clone(&fake))
            .run(input.path(), output.path(), &cancel)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert!(report.outputs.is_empty());
        assert!(fake.calls().is_empty());
        assert!(!output.path().join("video1.mp4").exists());
    }

    /// Cancels its own token mid-call, as a user pressing Cancel while
    /// the external process runs would.
    struct CancellingConcatenator;

    #[async_trait]
    impl Concatenate for CancellingConcatenator {
        async fn concatenate(
            &self,
            _inputs: &[PathBuf],
            _output: &Path,
            _rotate: bool,
            cancel: &CancellationToken,
        ) -> ConcatResult<()> {
            cancel.cancel();
            Err(ConcatError::Cancelled)
        }
    }

    #[tokio::test]
    async fn inflight_cancellation_keeps_finished_outputs() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        // Group 0001 copies first; group 0002 cancels mid-concatenation.
        write_file(input.path(), "GH010001.MP4", b"done before cancel");
        write_file(input.path(), "GH010002.MP4", b"a");
        write_file(input.path(), "GH020002.MP4", b"b");

        let orch = Orchestrator::with_concatenator(
            Arc::new(CancellingConcatenator),
            ConcatSettings::default(),
            RunLogger::new(),
        );
        let report = orch
            .run(input.path(), output.path(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.outputs, vec![output.path().join("video1.mp4")]);
        assert!(output.path().join("video1.mp4").exists());
        assert!(!output.path().join("video2.mp4").exists());
    }

    #[tokio::test]
    async fn capability_failure_halts_the_run() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        // Failing multi-file group first, then a copyable group after.
        write_file(input.path(), "GH010001.MP4", b"a");
        write_file(input.path(), "GH020001.MP4", b"b");
        write_file(input.path(), "GH010002.MP4", b"c");

        let fake = Arc::new(RecordingConcatenator::failing());
        let result = orchestrator(Arc::clone(&fake))
            .run(input.path(), output.path(), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(RunError::Concat(ConcatError::CommandFailed { .. }))
        ));
        // The later group was never reached.
        assert!(!output.path().join("video2.mp4").exists());
    }

    #[tokio::test]
    async fn progress_lines_precede_outputs_in_order() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_file(input.path(), "GH010003.MP4", b"only 3");
        write_file(input.path(), "GH010007.MP4", b"seg 1");
        write_file(input.path(), "GH020007.MP4", b"seg 2");

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let logger = RunLogger::with_callback(Box::new(move |line| {
            sink.lock().unwrap().push(line.to_string());
        }));

        let fake = Arc::new(RecordingConcatenator::default());
        let orch =
            Orchestrator::with_concatenator(fake.clone(), ConcatSettings::default(), logger);
        orch.run(input.path(), output.path(), &CancellationToken::new())
            .await
            .unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("GH010003.MP4"));
        assert!(lines[0].contains("video1.mp4"));
        // Multi-file line joins inputs in sequence order.
        let expected_join = format!(
            "{}\n{}",
            input.path().join("GH010007.MP4").display(),
            input.path().join("GH020007.MP4").display()
        );
        assert!(lines[1].contains(&expected_join));
        assert!(lines[1].contains("video2.mp4"));
    }

    #[tokio::test]
    async fn copy_failure_is_fatal() {
        let output = tempdir().unwrap();

        // A group whose lone source vanished between scan and copy.
        let mut groups = Groups::new();
        groups.insert(
            1,
            vec![MediaFile::new(1, 1, "/nonexistent/GH010001.MP4").unwrap()],
        );

        let fake = Arc::new(RecordingConcatenator::default());
        let result = orchestrator(fake)
            .process_groups(&groups, output.path(), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(RunError::Copy { .. })));
    }
}
