//! Run reports and phase timings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Wall-clock durations for each phase of a run.
///
/// Write-once and reporting-only: timings never influence behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct JobTiming {
    /// Seconds spent downloading the source video.
    pub download_seconds: f64,
    /// Seconds spent trimming and re-encoding.
    pub encode_seconds: f64,
    /// Total seconds including setup and cleanup.
    pub total_seconds: f64,
}

/// Terminal result of one clip run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the run produced a clip.
    pub success: bool,
    /// Path to the final clip (if successful).
    pub output_path: Option<PathBuf>,
    /// Error message (if failed).
    pub error: Option<String>,
    /// Phase timings.
    pub timing: JobTiming,
    /// Path to the per-run log file (if one was created).
    pub log_path: Option<PathBuf>,
}

impl RunReport {
    /// Create a successful report.
    pub fn success(output_path: PathBuf, timing: JobTiming, log_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
            error: None,
            timing,
            log_path,
        }
    }

    /// Create a failed report.
    pub fn failure(error: impl Into<String>, timing: JobTiming, log_path: Option<PathBuf>) -> Self {
        Self {
            success: false,
            output_path: None,
            error: Some(error.into()),
            timing,
            log_path,
        }
    }
}
