//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::ClipRequest;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, overall_percent, message)
///
/// The percent is on the single overall scale both front-ends display:
/// download progress maps to 0-50, encode start reports 70, and a
/// finished run reports 100.
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains the clip request and shared resources that steps can read
/// but not modify. Mutable state goes in `JobState`.
pub struct Context {
    /// The clip request being processed.
    pub request: ClipRequest,
    /// Application settings.
    pub settings: Settings,
    /// Run name/identifier.
    pub job_name: String,
    /// Instant the run started; timestamped names derive from this.
    pub started_at: DateTime<Local>,
    /// Per-run logger.
    pub logger: Arc<JobLogger>,
    /// Optional progress callback.
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a new context for a run.
    pub fn new(
        request: ClipRequest,
        settings: Settings,
        job_name: impl Into<String>,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            request,
            settings,
            job_name: job_name.into(),
            started_at: Local::now(),
            logger,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the run start instant.
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }

    /// Folder the temp download and final clip land in.
    pub fn output_dir(&self) -> &PathBuf {
        &self.request.output_dir
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// This is the "write-once manifest" - steps can add new data but
/// should not overwrite existing values. Each step's output is stored
/// in its own section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique run identifier.
    pub job_id: String,
    /// When the run started.
    pub started_at: Option<String>,
    /// Fetch results (from Fetch step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch: Option<FetchOutput>,
    /// Encode results (from Encode step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<EncodeOutput>,
}

impl JobState {
    /// Create a new run state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if the fetch step has completed.
    pub fn has_fetch(&self) -> bool {
        self.fetch.is_some()
    }

    /// Check if the encode step has completed.
    pub fn has_encode(&self) -> bool {
        self.encode.is_some()
    }
}

/// Output from the Fetch step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutput {
    /// Path to the downloaded temp file.
    pub temp_path: PathBuf,
    /// Seconds spent downloading.
    pub elapsed_seconds: f64,
}

/// Output from the Encode step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeOutput {
    /// Path to the final clip.
    pub output_path: PathBuf,
    /// ffmpeg exit code.
    pub exit_code: i32,
    /// Seconds spent encoding.
    pub elapsed_seconds: f64,
    /// ffmpeg command that was run.
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_state_tracks_completion() {
        let mut state = JobState::new("clip-123");
        assert!(!state.has_fetch());
        assert!(!state.has_encode());

        state.fetch = Some(FetchOutput {
            temp_path: PathBuf::from("/out/temp_full_video.mp4"),
            elapsed_seconds: 2.5,
        });

        assert!(state.has_fetch());
        assert!(!state.has_encode());
    }

    #[test]
    fn job_state_serializes() {
        let state = JobState::new("clip-456");
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"job_id\":\"clip-456\""));
        // Unset step outputs are omitted entirely
        assert!(!json.contains("fetch"));
    }
}
