//! Pipeline orchestrator for producing clips.
//!
//! This module provides the infrastructure for running the two-step
//! fetch/encode pipeline. Each run consists of a sequence of steps
//! that validate, execute, and record their results.
//!
//! # Architecture
//!
//! ```text
//! ClipRunner
//!     └── Pipeline
//!             ├── Step: Fetch   (yt-dlp, progress 0-50)
//!             └── Step: Encode  (ffmpeg, progress 70 -> 100)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ytc_core::orchestrator::ClipRunner;
//!
//! let runner = ClipRunner::new(settings, ".logs");
//! let report = runner.run(&request, None, None);
//! if report.success {
//!     println!("Saved: {}", report.output_path.unwrap().display());
//! }
//! ```

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use runner::ClipRunner;
pub use step::PipelineStep;
pub use steps::{EncodeStep, FetchStep};
pub use types::{Context, EncodeOutput, FetchOutput, JobState, ProgressCallback};

use crate::config::Settings;

/// Create the standard clip pipeline: Fetch then Encode.
///
/// Tool path overrides from the settings are applied here.
pub fn create_clip_pipeline(settings: &Settings) -> Pipeline {
    let mut fetch = FetchStep::new();
    if !settings.fetch.ytdlp_path.is_empty() {
        fetch = fetch.with_ytdlp_path(&settings.fetch.ytdlp_path);
    }

    let mut encode = EncodeStep::new();
    if !settings.encode.ffmpeg_path.is_empty() {
        encode = encode.with_ffmpeg_path(&settings.encode.ffmpeg_path);
    }

    Pipeline::new().with_step(fetch).with_step(encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_has_fetch_then_encode() {
        let pipeline = create_clip_pipeline(&Settings::default());
        assert_eq!(pipeline.step_names(), vec!["Fetch", "Encode"]);
    }
}
