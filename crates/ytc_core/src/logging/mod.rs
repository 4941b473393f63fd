//! Logging infrastructure for yt-clipper.
//!
//! This module provides:
//! - Per-run loggers with file + GUI callback dual output
//! - Compact mode with progress filtering
//! - Tail buffer for error diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use ytc_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new(
//!     "clip_20240101_120000",
//!     ".logs",
//!     LogConfig::default(),
//!     None,
//! ).unwrap();
//!
//! logger.info("Starting run");
//! logger.phase("Fetch");
//! logger.command("yt-dlp -f 'best[height<=360]' ...");
//! logger.progress(50);
//! logger.success("Run completed");
//! ```

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
