//! ytclip - download a clip from a video URL and re-encode it small.
//!
//! One-shot CLI around the ytc_core pipeline: fetch with yt-dlp, trim
//! and re-encode with ffmpeg, burn in the title caption, and clean up
//! the temp download. Exits non-zero on any failure.

use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::Parser;

use ytc_core::config::ConfigManager;
use ytc_core::logging::{init_tracing, GuiLogCallback, LogLevel};
use ytc_core::models::{ClipRequest, OutputNaming, Timestamp};
use ytc_core::orchestrator::{ClipRunner, ProgressCallback};

#[derive(Parser, Debug)]
#[command(
    name = "ytclip",
    version,
    about = "Download a section of a video and save it as a small optimized clip"
)]
struct Cli {
    /// Source video URL (anything yt-dlp accepts)
    #[arg(short, long)]
    url: String,

    /// Clip start time, HH:MM:SS
    #[arg(short, long)]
    start: String,

    /// Clip end time, HH:MM:SS
    #[arg(short, long)]
    end: String,

    /// Output folder for the clip
    #[arg(short, long, default_value = "./")]
    output: PathBuf,

    /// Caption burned into the clip
    #[arg(short, long)]
    title: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(LogLevel::Warn);

    let start: Timestamp = cli
        .start
        .parse()
        .with_context(|| format!("bad --start value '{}'", cli.start))?;
    let end: Timestamp = cli
        .end
        .parse()
        .with_context(|| format!("bad --end value '{}'", cli.end))?;

    let mut config = ConfigManager::new(ConfigManager::default_path());
    config
        .load_or_create()
        .context("failed to load configuration")?;
    tracing::debug!("config loaded from {}", config.path().display());

    let request = ClipRequest::new(cli.url, start, end, cli.output)
        .with_caption(cli.title)
        .with_naming(OutputNaming::Static);

    let log_callback: GuiLogCallback = Box::new(|line| println!("{}", line));
    let progress_callback: ProgressCallback = Box::new(|step, percent, message| {
        println!("[{:>3}%] {}: {}", percent, step, message);
    });

    let runner = ClipRunner::new(config.settings().clone(), config.logs_folder());
    let report = runner.run(&request, Some(log_callback), Some(progress_callback));

    println!();
    println!("Summary:");
    println!("  - Download time: {:.2}s", report.timing.download_seconds);
    println!("  - Encode time:   {:.2}s", report.timing.encode_seconds);
    println!("  - Total time:    {:.2}s", report.timing.total_seconds);

    match (report.success, report.output_path) {
        (true, Some(path)) => {
            println!("Success! Optimized clip saved as: {}", path.display());
            Ok(())
        }
        _ => Err(anyhow!(
            report
                .error
                .unwrap_or_else(|| "run failed for an unknown reason".to_string())
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "ytclip",
            "-u",
            "https://example.com/watch?v=abc",
            "-s",
            "00:01:00",
            "-e",
            "00:01:30",
            "-o",
            "/tmp/clips",
            "-t",
            "My Clip",
        ])
        .unwrap();

        assert_eq!(cli.url, "https://example.com/watch?v=abc");
        assert_eq!(cli.start, "00:01:00");
        assert_eq!(cli.end, "00:01:30");
        assert_eq!(cli.output, PathBuf::from("/tmp/clips"));
        assert_eq!(cli.title, "My Clip");
    }

    #[test]
    fn output_defaults_to_current_dir() {
        let cli = Cli::try_parse_from([
            "ytclip",
            "--url",
            "https://example.com/v",
            "--start",
            "00:00:00",
            "--end",
            "00:00:30",
            "--title",
            "t",
        ])
        .unwrap();

        assert_eq!(cli.output, PathBuf::from("./"));
    }

    #[test]
    fn missing_required_flags_fail() {
        assert!(Cli::try_parse_from(["ytclip", "-u", "https://example.com/v"]).is_err());
    }
}
