//! Download (yt-dlp) support.
//!
//! The actual subprocess is driven by the orchestrator's fetch step;
//! this module holds the pure pieces: format selection, command-line
//! construction, progress-line parsing, and temp artifact discovery.

mod format;
mod progress;

pub use format::{
    build_download_args, find_temp_artifact, temp_artifacts, temp_output_template, FormatSelector,
    TEMP_STEM,
};
pub use progress::{parse_progress_line, DownloadProgress, PROGRESS_TAG};
