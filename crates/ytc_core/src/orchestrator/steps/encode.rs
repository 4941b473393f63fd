//! Encode step - trims and re-encodes the downloaded video with ffmpeg.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use crate::encode::Caption;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, EncodeOutput, JobState};

/// Encode step for cutting the requested range into the final clip.
///
/// Runs ffmpeg synchronously with a fixed argument vector; the typed
/// profile and caption descriptor are rendered to arguments here.
pub struct EncodeStep {
    /// Path to ffmpeg executable (None = find in PATH).
    ffmpeg_path: Option<PathBuf>,
}

impl EncodeStep {
    pub fn new() -> Self {
        Self { ffmpeg_path: None }
    }

    /// Set a custom path to the ffmpeg executable.
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Get the ffmpeg executable path/command.
    fn ffmpeg_cmd(&self) -> &str {
        self.ffmpeg_path
            .as_ref()
            .and_then(|p| p.to_str())
            .unwrap_or("ffmpeg")
    }

    /// Caption descriptor for this run, if the request carries text.
    fn caption(&self, ctx: &Context) -> Option<Caption> {
        ctx.request
            .caption
            .as_ref()
            .filter(|text| !text.trim().is_empty())
            .map(|text| ctx.settings.encode.caption(text.clone()))
    }

    /// Execute ffmpeg with the given arguments.
    fn run_ffmpeg(&self, ctx: &Context, args: &[String]) -> StepResult<i32> {
        let ffmpeg = self.ffmpeg_cmd();
        ctx.logger.command(&format!("{} {}", ffmpeg, args.join(" ")));

        let result = Command::new(ffmpeg)
            .args(args)
            .output()
            .map_err(|e| StepError::io_error("executing ffmpeg", e))?;

        let exit_code = result.status.code().unwrap_or(-1);

        if !result.stdout.is_empty() {
            let stdout = String::from_utf8_lossy(&result.stdout);
            for line in stdout.lines() {
                ctx.logger.output_line(line, false);
            }
        }
        if !result.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            for line in stderr.lines() {
                ctx.logger.output_line(line, true);
            }
        }

        if exit_code != 0 {
            ctx.logger.show_tail("ffmpeg output");
            return Err(StepError::command_failed(
                "ffmpeg",
                exit_code,
                String::from_utf8_lossy(&result.stderr).to_string(),
            ));
        }

        Ok(exit_code)
    }
}

impl Default for EncodeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for EncodeStep {
    fn name(&self) -> &str {
        "Encode"
    }

    fn description(&self) -> &str {
        "Trim and re-encode the clip with ffmpeg"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        // A caption needs its font before ffmpeg is ever invoked
        if let Some(caption) = self.caption(ctx) {
            if !caption.font_exists() {
                return Err(StepError::file_not_found(
                    caption.font_file.to_string_lossy(),
                ));
            }
        }

        std::fs::create_dir_all(ctx.output_dir())
            .map_err(|e| StepError::io_error("creating output directory", e))?;

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        let temp_path = state
            .fetch
            .as_ref()
            .map(|f| f.temp_path.clone())
            .ok_or_else(|| StepError::precondition_failed("Fetch step has not run"))?;

        let output_path = ctx
            .output_dir()
            .join(ctx.request.naming.file_name(ctx.started_at));
        ctx.logger
            .info(&format!("Output: {}", output_path.display()));

        let profile = ctx.settings.encode.profile();
        let caption = self.caption(ctx);
        let args = profile.build_args(
            &temp_path,
            ctx.request.start,
            ctx.request.end,
            caption.as_ref(),
            &output_path,
        );

        ctx.logger.section("Executing ffmpeg");
        ctx.report_progress("Encode", 70, "Encoding clip");

        let started = Instant::now();
        let exit_code = self.run_ffmpeg(ctx, &args)?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        ctx.logger.success(&format!(
            "Encoded {} in {:.1}s",
            output_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy(),
            elapsed_seconds
        ));

        state.encode = Some(EncodeOutput {
            output_path,
            exit_code,
            elapsed_seconds,
            command: format!("{} {}", self.ffmpeg_cmd(), args.join(" ")),
        });

        ctx.report_progress("Encode", 100, "Encode complete");

        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let encode = state
            .encode
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Encode results not recorded"))?;

        if !encode.output_path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Output file not created: {}",
                encode.output_path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_step_has_correct_name() {
        let step = EncodeStep::new();
        assert_eq!(step.name(), "Encode");
    }

    #[test]
    fn encode_step_with_custom_path() {
        let step = EncodeStep::new().with_ffmpeg_path("/usr/bin/ffmpeg");
        assert_eq!(step.ffmpeg_cmd(), "/usr/bin/ffmpeg");
    }
}
