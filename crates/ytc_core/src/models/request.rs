//! Clip request and output naming.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Strategy for naming the final clip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// Fixed name, overwritten on every run (CLI default).
    #[default]
    Static,
    /// Timestamped name, unique per run (GUI default).
    Timestamped,
}

impl OutputNaming {
    /// Produce the output file name for a run that started at `at`.
    ///
    /// The runner captures one start instant per run so the clip name
    /// and the log file name carry the same timestamp.
    pub fn file_name(&self, at: DateTime<Local>) -> String {
        match self {
            OutputNaming::Static => "optimized_clip.mp4".to_string(),
            OutputNaming::Timestamped => {
                format!("clip_{}.mp4", at.format("%Y%m%d_%H%M%S"))
            }
        }
    }
}

/// Everything needed to produce one clip.
///
/// Built by a front-end from user input and handed to the runner.
/// The request is read-only during the run; results accumulate in
/// the job state instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipRequest {
    /// Source video URL (anything yt-dlp accepts).
    pub source_url: String,
    /// Clip start offset.
    pub start: Timestamp,
    /// Clip end offset.
    pub end: Timestamp,
    /// Folder the final clip (and the temp download) land in.
    pub output_dir: PathBuf,
    /// Optional caption burned into the video.
    pub caption: Option<String>,
    /// Output file naming strategy.
    #[serde(default)]
    pub naming: OutputNaming,
}

impl ClipRequest {
    /// Create a request with no caption and static naming.
    pub fn new(
        source_url: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            start,
            end,
            output_dir: output_dir.into(),
            caption: None,
            naming: OutputNaming::default(),
        }
    }

    /// Set the caption text.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the output naming strategy.
    pub fn with_naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }
}
