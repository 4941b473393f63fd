//! Clip runner - wraps the pipeline with setup, timing, and cleanup.
//!
//! Front-ends hand a `ClipRequest` to the runner and get a `RunReport`
//! back. Whatever happens in between, the temp download is removed
//! before the report is produced.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;

use crate::config::Settings;
use crate::fetch::temp_artifacts;
use crate::logging::{GuiLogCallback, JobLogger};
use crate::models::{ClipRequest, JobTiming, RunReport};

use super::errors::PipelineError;
use super::types::{Context, JobState, ProgressCallback};
use super::{create_clip_pipeline, Pipeline};

/// Runs one clip request through the standard pipeline.
///
/// The runner is responsible for:
/// - Creating the per-run logger and output folder
/// - Running the pipeline
/// - Unconditional temp cleanup, success or failure
/// - Collecting phase timings into the final report
pub struct ClipRunner {
    /// Application settings.
    settings: Settings,
    /// Directory for log files.
    log_dir: PathBuf,
}

impl ClipRunner {
    /// Create a new runner.
    pub fn new(settings: Settings, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            log_dir: log_dir.into(),
        }
    }

    /// Process a single clip request.
    ///
    /// # Arguments
    /// * `request` - The clip to produce
    /// * `gui_callback` - Optional callback for GUI log output
    /// * `progress_callback` - Optional callback for progress updates
    pub fn run(
        &self,
        request: &ClipRequest,
        gui_callback: Option<GuiLogCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> RunReport {
        // One start instant names the log file and the timestamped clip
        let started_at = Local::now();
        let job_name = format!("clip_{}", started_at.format("%Y%m%d_%H%M%S"));
        let started = Instant::now();

        tracing::info!("starting run {}", job_name);

        if let Err(e) = std::fs::create_dir_all(&request.output_dir) {
            let err = PipelineError::setup_failed(
                &job_name,
                format!("could not create output directory: {}", e),
            );
            tracing::warn!("{}", err);
            return RunReport::failure(err.to_string(), JobTiming::default(), None);
        }

        let logger = match JobLogger::new(
            &job_name,
            &self.log_dir,
            self.settings.logging.to_log_config(),
            gui_callback,
        ) {
            Ok(l) => Arc::new(l),
            Err(e) => {
                let err = PipelineError::setup_failed(
                    &job_name,
                    format!("could not create log file: {}", e),
                );
                tracing::warn!("{}", err);
                return RunReport::failure(err.to_string(), JobTiming::default(), None);
            }
        };
        let log_path = logger.log_path().to_path_buf();

        let mut ctx = Context::new(
            request.clone(),
            self.settings.clone(),
            &job_name,
            Arc::clone(&logger),
        )
        .with_started_at(started_at);
        if let Some(callback) = progress_callback {
            ctx = ctx.with_progress_callback(callback);
        }

        let mut state = JobState::new(&job_name);
        let pipeline: Pipeline = create_clip_pipeline(&self.settings);

        logger.info(&format!("Starting run: {}", job_name));
        logger.info(&format!("Source: {}", request.source_url));
        logger.info(&format!(
            "Range: {} - {}",
            request.start, request.end
        ));

        let run_result = pipeline.run(&ctx, &mut state);

        // Cleanup runs on every path out of the pipeline
        self.cleanup_temp(&request.output_dir, &logger);

        let timing = JobTiming {
            download_seconds: state.fetch.as_ref().map(|f| f.elapsed_seconds).unwrap_or(0.0),
            encode_seconds: state
                .encode
                .as_ref()
                .map(|e| e.elapsed_seconds)
                .unwrap_or(0.0),
            total_seconds: started.elapsed().as_secs_f64(),
        };

        match run_result {
            Ok(_) => {
                let output_path = match state.encode.as_ref() {
                    Some(encode) => encode.output_path.clone(),
                    None => {
                        // Unreachable with the standard pipeline, but the
                        // report must not claim an output that isn't there.
                        logger.error("Pipeline succeeded without an encode result");
                        return RunReport::failure(
                            "Pipeline succeeded without an encode result",
                            timing,
                            Some(log_path),
                        );
                    }
                };

                logger.info(&format!("Run completed: {}", output_path.display()));
                tracing::info!(
                    "run {} finished in {:.1}s",
                    job_name,
                    timing.total_seconds
                );
                RunReport::success(output_path, timing, Some(log_path))
            }
            Err(e) => {
                let error_msg = e.to_string();
                logger.error(&error_msg);
                tracing::warn!("run {} failed: {}", job_name, error_msg);
                RunReport::failure(error_msg, timing, Some(log_path))
            }
        }
    }

    /// Remove every temp artifact in the output folder.
    ///
    /// Deletion errors are logged, never escalated; a stale temp file
    /// must not turn a finished run into a failure.
    fn cleanup_temp(&self, output_dir: &PathBuf, logger: &JobLogger) {
        for path in temp_artifacts(output_dir) {
            match std::fs::remove_file(&path) {
                Ok(()) => logger.info(&format!("Removed temp file: {}", path.display())),
                Err(e) => logger.warn(&format!(
                    "Could not remove temp file {}: {}",
                    path.display(),
                    e
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use tempfile::tempdir;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn failing_fetch_settings(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        // Point at a binary that cannot exist so the fetch step fails
        // without touching the network.
        settings.fetch.ytdlp_path = dir
            .join("no_such_tool")
            .to_string_lossy()
            .to_string();
        settings
    }

    #[test]
    fn failed_fetch_produces_failure_report() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let settings = failing_fetch_settings(dir.path());
        let runner = ClipRunner::new(settings, dir.path().join("logs"));

        let request = ClipRequest::new(
            "https://example.com/watch?v=abc",
            ts("00:00:00"),
            ts("00:00:30"),
            &out_dir,
        );

        let report = runner.run(&request, None, None);

        assert!(!report.success);
        assert!(report.error.is_some());
        assert!(report.output_path.is_none());
        // No clip may appear on a failed run
        assert!(!out_dir.join("optimized_clip.mp4").exists());
    }

    #[test]
    fn cleanup_removes_stale_temp_files_even_on_failure() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        // A leftover from a previous, interrupted run
        let stale = out_dir.join("temp_full_video.webm");
        std::fs::write(&stale, b"stale").unwrap();

        let settings = failing_fetch_settings(dir.path());
        let runner = ClipRunner::new(settings, dir.path().join("logs"));

        let request = ClipRequest::new(
            "https://example.com/watch?v=abc",
            ts("00:00:00"),
            ts("00:00:30"),
            &out_dir,
        );

        let report = runner.run(&request, None, None);

        assert!(!report.success);
        assert!(!stale.exists());
    }

    #[test]
    fn setup_failure_is_reported_with_run_context() {
        let dir = tempdir().unwrap();

        // A plain file where the output directory should go makes
        // create_dir_all fail before the pipeline is built.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let runner = ClipRunner::new(Settings::default(), dir.path().join("logs"));

        let request = ClipRequest::new(
            "https://example.com/watch?v=abc",
            ts("00:00:00"),
            ts("00:00:30"),
            blocker.join("out"),
        );

        let report = runner.run(&request, None, None);

        assert!(!report.success);
        let error = report.error.expect("setup failure must carry an error");
        assert!(error.contains("setup failed"));
        assert!(error.contains("output directory"));
        // The run never got far enough to open a log file
        assert!(report.log_path.is_none());
    }

    #[test]
    fn report_carries_log_path() {
        let dir = tempdir().unwrap();

        let settings = failing_fetch_settings(dir.path());
        let runner = ClipRunner::new(settings, dir.path().join("logs"));

        let request = ClipRequest::new(
            "https://example.com/watch?v=abc",
            ts("00:00:00"),
            ts("00:00:30"),
            dir.path().join("out"),
        );

        let report = runner.run(&request, None, None);

        let log_path = report.log_path.expect("log file should be created");
        assert!(log_path.exists());
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Starting run"));
    }

    #[test]
    fn progress_callback_receives_updates() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let dir = tempdir().unwrap();
        let settings = failing_fetch_settings(dir.path());
        let runner = ClipRunner::new(settings, dir.path().join("logs"));

        let request = ClipRequest::new(
            "https://example.com/watch?v=abc",
            ts("00:00:00"),
            ts("00:00:30"),
            dir.path().join("out"),
        );

        let saw_fetch = Arc::new(AtomicBool::new(false));
        let saw_fetch_clone = Arc::clone(&saw_fetch);
        let callback: ProgressCallback = Box::new(move |step, _percent, _msg| {
            if step == "Fetch" {
                saw_fetch_clone.store(true, Ordering::SeqCst);
            }
        });

        let _ = runner.run(&request, None, Some(callback));

        assert!(saw_fetch.load(Ordering::SeqCst));
    }
}
