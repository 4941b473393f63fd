//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::encode::{Caption, EncodeProfile};
use crate::fetch::FormatSelector;
use crate::logging::LogConfig;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Download (yt-dlp) settings.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Encode (ffmpeg) settings.
    #[serde(default)]
    pub encode: EncodeSettings,
}

/// Path configuration for output and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Default output folder for clips (front-ends may override per run).
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "./".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Number of output lines to show in tail after an error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Show timestamps in log output.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_progress_step() -> u32 {
    20
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            progress_step: default_progress_step(),
            error_tail: default_error_tail(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// Convert to the runtime log configuration.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            compact: self.compact,
            progress_step: self.progress_step,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
            ..LogConfig::default()
        }
    }
}

/// Download (yt-dlp) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Height cap for `best[height<=N]` selection.
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Explicit yt-dlp format code (e.g. "18"). Empty = use max_height.
    #[serde(default)]
    pub format_id: String,

    /// Path to yt-dlp executable. Empty = find in PATH.
    #[serde(default)]
    pub ytdlp_path: String,
}

fn default_max_height() -> u32 {
    360
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
            format_id: String::new(),
            ytdlp_path: String::new(),
        }
    }
}

impl FetchSettings {
    /// Build the format selector from these settings.
    pub fn selector(&self) -> FormatSelector {
        if self.format_id.is_empty() {
            FormatSelector::MaxHeight(self.max_height)
        } else {
            FormatSelector::Id(self.format_id.clone())
        }
    }
}

/// Encode (ffmpeg) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Output width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// x264 preset.
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Video bitrate in kbps (maxrate = bitrate, bufsize = 2x).
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbps.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,

    /// Font file used for burned-in captions.
    #[serde(default = "default_font_file")]
    pub font_file: String,

    /// Caption font size.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Path to ffmpeg executable. Empty = find in PATH.
    #[serde(default)]
    pub ffmpeg_path: String,
}

fn default_width() -> u32 {
    256
}

fn default_height() -> u32 {
    144
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_video_bitrate() -> u32 {
    86
}

fn default_audio_bitrate() -> u32 {
    64
}

fn default_font_file() -> String {
    "/Library/Fonts/Arial Unicode.ttf".to_string()
}

fn default_font_size() -> u32 {
    16
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            preset: default_preset(),
            video_bitrate_kbps: default_video_bitrate(),
            audio_bitrate_kbps: default_audio_bitrate(),
            font_file: default_font_file(),
            font_size: default_font_size(),
            ffmpeg_path: String::new(),
        }
    }
}

impl EncodeSettings {
    /// Build the encode profile from these settings.
    pub fn profile(&self) -> EncodeProfile {
        EncodeProfile {
            width: self.width,
            height: self.height,
            preset: self.preset.clone(),
            video_bitrate_kbps: self.video_bitrate_kbps,
            audio_bitrate_kbps: self.audio_bitrate_kbps,
        }
    }

    /// Build a caption descriptor for the given text.
    pub fn caption(&self, text: impl Into<String>) -> Caption {
        Caption::new(text, &self.font_file, self.font_size)
    }
}

/// Identifies a config section for atomic section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Fetch,
    Encode,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Fetch => "fetch",
            ConfigSection::Encode => "encode",
        }
    }

    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Paths,
            ConfigSection::Logging,
            ConfigSection::Fetch,
            ConfigSection::Encode,
        ]
    }
}
