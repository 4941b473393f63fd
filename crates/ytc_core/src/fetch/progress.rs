//! Parsing of yt-dlp progress-template lines.

/// Tag prefixing every templated progress line so they can be told apart
/// from ordinary yt-dlp output.
pub const PROGRESS_TAG: &str = "YTC";

/// One parsed download progress update.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    /// Download percent, 0.0 - 100.0.
    pub percent: f32,
    /// Human-readable speed (e.g. "1.25MiB/s"), if reported.
    pub speed: Option<String>,
    /// Human-readable ETA (e.g. "00:05"), if reported.
    pub eta: Option<String>,
}

/// Parse a line emitted through the progress template.
///
/// Expected shape: `YTC|  42.3%| 1.25MiB/s|00:05`. Returns `None` for
/// any other line (regular yt-dlp output passes through untouched).
pub fn parse_progress_line(line: &str) -> Option<DownloadProgress> {
    let rest = line.trim().strip_prefix(PROGRESS_TAG)?.strip_prefix('|')?;

    let mut fields = rest.splitn(3, '|');
    let percent_str = fields.next()?.trim();
    let speed = fields.next().map(str::trim).filter(|s| is_known(s));
    let eta = fields.next().map(str::trim).filter(|s| is_known(s));

    let percent: f32 = percent_str.trim_end_matches('%').trim().parse().ok()?;

    Some(DownloadProgress {
        percent: percent.clamp(0.0, 100.0),
        speed: speed.map(String::from),
        eta: eta.map(String::from),
    })
}

/// yt-dlp renders unknown fields as "N/A" or leaves them empty.
fn is_known(field: &str) -> bool {
    !field.is_empty() && field != "N/A" && field != "NA"
}
