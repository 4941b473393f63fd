//! ytc_core - Backend logic for yt-clipper
//!
//! This crate contains all business logic with zero UI dependencies:
//! fetching a source video with yt-dlp, trimming and re-encoding it
//! with ffmpeg, and the orchestration around both. It is used by the
//! `ytclip` CLI and the `ytclip-gui` desktop application.

pub mod config;
pub mod encode;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
