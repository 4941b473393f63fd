//! Fetch step - downloads the full source video with yt-dlp.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::fetch::{
    build_download_args, find_temp_artifact, parse_progress_line, temp_output_template,
    DownloadProgress,
};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, FetchOutput, JobState};

/// Fetch step for downloading the source video with yt-dlp.
///
/// Streams yt-dlp's stdout to pick up templated progress lines as they
/// arrive; regular output and stderr go to the run log.
pub struct FetchStep {
    /// Path to yt-dlp executable (None = find in PATH).
    ytdlp_path: Option<PathBuf>,
}

impl FetchStep {
    pub fn new() -> Self {
        Self { ytdlp_path: None }
    }

    /// Set a custom path to the yt-dlp executable.
    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = Some(path.into());
        self
    }

    /// Get the yt-dlp executable path/command.
    fn ytdlp_cmd(&self) -> &str {
        self.ytdlp_path
            .as_ref()
            .and_then(|p| p.to_str())
            .unwrap_or("yt-dlp")
    }

    /// Forward one parsed progress update to the log and the overall
    /// progress callback. Download covers the 0-50 band.
    fn report(&self, ctx: &Context, progress: &DownloadProgress) {
        let overall = (progress.percent / 2.0) as u32;

        let mut message = format!("Downloading {:.1}%", progress.percent);
        if let Some(ref speed) = progress.speed {
            message.push_str(&format!(" at {}", speed));
        }
        if let Some(ref eta) = progress.eta {
            message.push_str(&format!(", ETA {}", eta));
        }

        ctx.logger.progress(overall);
        ctx.report_progress("Fetch", overall, &message);
    }

    /// Run yt-dlp, streaming stdout for progress.
    fn run_ytdlp(&self, ctx: &Context, args: &[String]) -> StepResult<()> {
        let ytdlp = self.ytdlp_cmd();
        ctx.logger.command(&format!("{} {}", ytdlp, args.join(" ")));

        let mut child = Command::new(ytdlp)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StepError::io_error("spawning yt-dlp", e))?;

        // Drain stderr on its own thread so neither pipe can fill up.
        let stderr_handle = child.stderr.take().map(|stderr| {
            std::thread::spawn(move || {
                BufReader::new(stderr)
                    .lines()
                    .map_while(Result::ok)
                    .collect::<Vec<String>>()
            })
        });

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                match parse_progress_line(&line) {
                    Some(progress) => self.report(ctx, &progress),
                    None => ctx.logger.output_line(&line, false),
                }
            }
        }

        let stderr_lines = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        for line in &stderr_lines {
            ctx.logger.output_line(line, true);
        }

        let status = child
            .wait()
            .map_err(|e| StepError::io_error("waiting for yt-dlp", e))?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            ctx.logger.show_tail("yt-dlp output");

            // Everything yt-dlp can fail with collapses into one category;
            // the stderr tail carries the detail.
            let tail_len = stderr_lines.len().saturating_sub(5);
            let detail = if stderr_lines.is_empty() {
                "download failed".to_string()
            } else {
                stderr_lines[tail_len..].join("; ")
            };
            return Err(StepError::command_failed("yt-dlp", exit_code, detail));
        }

        Ok(())
    }
}

impl Default for FetchStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for FetchStep {
    fn name(&self) -> &str {
        "Fetch"
    }

    fn description(&self) -> &str {
        "Download the source video with yt-dlp"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.request.source_url.trim().is_empty() {
            return Err(StepError::invalid_input("Source URL is empty"));
        }

        // Output directory doubles as the temp download location
        std::fs::create_dir_all(ctx.output_dir())
            .map_err(|e| StepError::io_error("creating output directory", e))?;

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        let template = temp_output_template(ctx.output_dir());
        let selector = ctx.settings.fetch.selector();
        let args = build_download_args(&ctx.request.source_url, &selector, &template);

        ctx.logger
            .info(&format!("Fetching: {}", ctx.request.source_url));
        ctx.report_progress("Fetch", 0, "Starting download");

        let started = Instant::now();
        self.run_ytdlp(ctx, &args)?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        let temp_path = find_temp_artifact(ctx.output_dir()).ok_or_else(|| {
            StepError::invalid_output("yt-dlp reported success but no temp file was found")
        })?;

        ctx.logger.info(&format!(
            "Downloaded to {} in {:.1}s",
            temp_path.display(),
            elapsed_seconds
        ));

        state.fetch = Some(FetchOutput {
            temp_path,
            elapsed_seconds,
        });

        ctx.report_progress("Fetch", 50, "Download complete");

        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let fetch = state
            .fetch
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Fetch results not recorded"))?;

        if !fetch.temp_path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Downloaded file missing: {}",
                fetch.temp_path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{JobLogger, LogConfig};
    use crate::models::ClipRequest;
    use crate::orchestrator::types::ProgressCallback;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn fetch_step_has_correct_name() {
        let step = FetchStep::new();
        assert_eq!(step.name(), "Fetch");
    }

    #[test]
    fn fetch_step_with_custom_path() {
        let step = FetchStep::new().with_ytdlp_path("/opt/bin/yt-dlp");
        assert_eq!(step.ytdlp_cmd(), "/opt/bin/yt-dlp");
    }

    #[test]
    fn download_percent_maps_to_lower_half() {
        let dir = tempdir().unwrap();
        let logger =
            Arc::new(JobLogger::new("test_run", dir.path(), LogConfig::default(), None).unwrap());

        let request = ClipRequest::new(
            "https://example.com/v",
            "00:00:00".parse().unwrap(),
            "00:00:30".parse().unwrap(),
            dir.path(),
        );

        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |_step, percent, _msg| {
            seen_clone.store(percent, Ordering::SeqCst);
        });

        let ctx = Context::new(request, Settings::default(), "test_run", logger)
            .with_progress_callback(callback);

        let step = FetchStep::new();
        step.report(
            &ctx,
            &DownloadProgress {
                percent: 84.0,
                speed: None,
                eta: None,
            },
        );
        assert_eq!(seen.load(Ordering::SeqCst), 42);

        step.report(
            &ctx,
            &DownloadProgress {
                percent: 100.0,
                speed: None,
                eta: None,
            },
        );
        assert_eq!(seen.load(Ordering::SeqCst), 50);
    }
}
