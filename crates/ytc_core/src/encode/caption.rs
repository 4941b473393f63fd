//! Burned-in caption descriptor and drawtext filter construction.
//!
//! Caption text reaches ffmpeg through the filter-graph language, which
//! has its own quoting rules. The descriptor here keeps the text as plain
//! data and only escapes it at the point where the filter expression is
//! rendered, so quotes, colons, and percent signs in a video title cannot
//! break (or smuggle options into) the filter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A caption to burn into the output video.
///
/// Position is fixed: horizontally centered, a few pixels above the
/// bottom edge, over a half-transparent black box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Caption text, unescaped.
    pub text: String,
    /// Font file used for rendering.
    pub font_file: PathBuf,
    /// Font size in points.
    pub font_size: u32,
    /// Font color (drawtext color spec).
    pub font_color: String,
    /// Background box color (drawtext color spec).
    pub box_color: String,
}

impl Caption {
    /// Create a caption with the default white-on-black style.
    pub fn new(text: impl Into<String>, font_file: impl Into<PathBuf>, font_size: u32) -> Self {
        Self {
            text: text.into(),
            font_file: font_file.into(),
            font_size,
            font_color: "white".to_string(),
            box_color: "black@0.5".to_string(),
        }
    }

    /// Whether the configured font file exists on disk.
    pub fn font_exists(&self) -> bool {
        self.font_file.is_file()
    }

    /// Render the complete drawtext filter expression.
    pub fn to_filter(&self) -> String {
        format!(
            "drawtext=text='{}':fontfile='{}':fontsize={}:fontcolor={}:box=1:boxcolor={}:x=(w-text_w)/2:y=h-text_h-10",
            escape_filter_text(&self.text),
            escape_filter_text(&self.font_file.to_string_lossy()),
            self.font_size,
            self.font_color,
            self.box_color,
        )
    }
}

/// Escape a value for embedding inside a single-quoted drawtext option.
///
/// Backslash and quote are escaped for the filter-graph parser (a quote
/// ends the quoted run, so it is rendered as `'\''`); colon and percent
/// are escaped for the drawtext option parser and its text expansion.
pub fn escape_filter_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\'' => out.push_str(r"'\''"),
            ':' => out.push_str(r"\:"),
            '%' => out.push_str(r"\%"),
            _ => out.push(c),
        }
    }
    out
}
