//! Format selection and yt-dlp command-line construction.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::progress::PROGRESS_TAG;

/// File stem of the temporary full download.
///
/// yt-dlp substitutes the real container extension, so discovery and
/// cleanup match on the stem rather than a full name.
pub const TEMP_STEM: &str = "temp_full_video";

/// How yt-dlp picks a format for the full download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatSelector {
    /// Best single file at or below the given height: `best[height<=N]`.
    MaxHeight(u32),
    /// An explicit yt-dlp format code, e.g. `18`.
    Id(String),
}

impl FormatSelector {
    /// The value passed to yt-dlp's `-f` flag.
    pub fn as_arg(&self) -> String {
        match self {
            FormatSelector::MaxHeight(height) => format!("best[height<={}]", height),
            FormatSelector::Id(id) => id.clone(),
        }
    }
}

/// Build the full yt-dlp argument vector for one download.
///
/// The progress template makes yt-dlp emit machine-parseable lines that
/// `parse_progress_line` understands; `--newline` keeps them one per line.
pub fn build_download_args(
    url: &str,
    selector: &FormatSelector,
    output_template: &Path,
) -> Vec<String> {
    vec![
        "--no-playlist".to_string(),
        "--newline".to_string(),
        "--progress".to_string(),
        "--no-warnings".to_string(),
        "--progress-template".to_string(),
        format!(
            "download:{}|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s",
            PROGRESS_TAG
        ),
        "-f".to_string(),
        selector.as_arg(),
        "-o".to_string(),
        output_template.to_string_lossy().to_string(),
        url.to_string(),
    ]
}

/// The output template handed to yt-dlp (`-o`), with the extension left
/// for yt-dlp to fill in.
pub fn temp_output_template(dir: &Path) -> PathBuf {
    dir.join(format!("{}.%(ext)s", TEMP_STEM))
}

/// Find the downloaded temp file, whatever extension yt-dlp chose.
pub fn find_temp_artifact(dir: &Path) -> Option<PathBuf> {
    temp_artifacts(dir).into_iter().next()
}

/// All files in `dir` whose name starts with the temp stem.
pub fn temp_artifacts(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(TEMP_STEM))
                    .unwrap_or(false)
        })
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn max_height_selector_formats() {
        assert_eq!(FormatSelector::MaxHeight(360).as_arg(), "best[height<=360]");
        assert_eq!(FormatSelector::MaxHeight(720).as_arg(), "best[height<=720]");
    }

    #[test]
    fn id_selector_passes_through() {
        assert_eq!(FormatSelector::Id("18".to_string()).as_arg(), "18");
    }

    #[test]
    fn download_args_have_expected_shape() {
        let args = build_download_args(
            "https://example.com/watch?v=abc",
            &FormatSelector::MaxHeight(360),
            Path::new("/tmp/out/temp_full_video.%(ext)s"),
        );

        assert_eq!(args[0], "--no-playlist");
        assert!(args.contains(&"--newline".to_string()));
        assert!(args.contains(&"--progress-template".to_string()));

        // -f selector, -o template, URL last
        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f_pos + 1], "best[height<=360]");
        let o_pos = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o_pos + 1], "/tmp/out/temp_full_video.%(ext)s");
        assert_eq!(args.last().unwrap(), "https://example.com/watch?v=abc");
    }

    #[test]
    fn temp_template_keeps_extension_placeholder() {
        let template = temp_output_template(Path::new("/clips"));
        assert_eq!(
            template,
            PathBuf::from("/clips/temp_full_video.%(ext)s")
        );
    }

    #[test]
    fn finds_temp_artifact_any_extension() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("temp_full_video.webm"), b"x").unwrap();
        std::fs::write(dir.path().join("other.mp4"), b"x").unwrap();

        let found = find_temp_artifact(dir.path()).unwrap();
        assert!(found.to_string_lossy().ends_with("temp_full_video.webm"));
    }

    #[test]
    fn lists_all_temp_artifacts() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("temp_full_video.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("temp_full_video.mp4.part"), b"x").unwrap();
        std::fs::write(dir.path().join("optimized_clip.mp4"), b"x").unwrap();

        let found = temp_artifacts(dir.path());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn empty_dir_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(find_temp_artifact(dir.path()).is_none());
        assert!(temp_artifacts(dir.path()).is_empty());
    }
}
