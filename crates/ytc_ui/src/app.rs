//! Application state, messages, and views.

use std::path::PathBuf;

use iced::widget::{button, column, container, progress_bar, row, scrollable, text, text_input};
use iced::{Element, Fill, Task, Theme};

use ytc_core::config::Settings;
use ytc_core::models::{ClipRequest, OutputNaming, Timestamp};

use crate::worker::{self, WorkerEvent};

/// Maximum log lines kept in the UI.
const LOG_CAP: usize = 500;

#[derive(Debug, Clone)]
pub enum Message {
    UrlChanged(String),
    StartChanged(String),
    EndChanged(String),
    CaptionChanged(String),
    OutputChanged(String),
    BrowseOutput,
    FolderSelected(Option<PathBuf>),
    StartClip,
    Worker(WorkerEvent),
}

pub struct App {
    settings: Settings,
    url: String,
    start_text: String,
    end_text: String,
    caption: String,
    output_dir: String,
    progress: f32,
    status: String,
    log: Vec<String>,
    running: bool,
}

impl App {
    pub fn new(settings: Settings) -> (Self, Task<Message>) {
        let output_dir = settings.paths.output_folder.clone();
        (
            Self {
                settings,
                url: String::new(),
                start_text: "00:00:00".to_string(),
                end_text: "00:00:30".to_string(),
                caption: String::new(),
                output_dir,
                progress: 0.0,
                status: "Ready".to_string(),
                log: Vec::new(),
                running: false,
            },
            Task::none(),
        )
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UrlChanged(value) => {
                self.url = value;
                Task::none()
            }
            Message::StartChanged(value) => {
                self.start_text = value;
                Task::none()
            }
            Message::EndChanged(value) => {
                self.end_text = value;
                Task::none()
            }
            Message::CaptionChanged(value) => {
                self.caption = value;
                Task::none()
            }
            Message::OutputChanged(value) => {
                self.output_dir = value;
                Task::none()
            }
            Message::BrowseOutput => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Select Output Folder")
                        .pick_folder()
                        .await
                        .map(|f| f.path().to_path_buf())
                },
                Message::FolderSelected,
            ),
            Message::FolderSelected(path) => {
                if let Some(p) = path {
                    self.output_dir = p.to_string_lossy().to_string();
                }
                Task::none()
            }
            Message::StartClip => self.start_clip(),
            Message::Worker(event) => {
                self.handle_worker_event(event);
                Task::none()
            }
        }
    }

    fn start_clip(&mut self) -> Task<Message> {
        let (start, end) = match parse_range(&self.start_text, &self.end_text) {
            Ok(range) => range,
            Err(message) => {
                self.status = message;
                return Task::none();
            }
        };

        let mut request = ClipRequest::new(
            self.url.trim(),
            start,
            end,
            PathBuf::from(self.output_dir.trim()),
        )
        .with_naming(OutputNaming::Timestamped);
        if let Some(caption) = caption_or_none(&self.caption) {
            request = request.with_caption(caption);
        }

        self.running = true;
        self.progress = 0.0;
        self.status = "Starting...".to_string();
        self.append_log(&format!("Starting clip: {}", request.source_url));

        Task::run(
            worker::run_clip(self.settings.clone(), request),
            Message::Worker,
        )
    }

    fn handle_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Progress { percent, message } => {
                self.progress = percent as f32;
                self.status = message;
            }
            WorkerEvent::Log(line) => self.append_log(&line),
            WorkerEvent::Finished(report) => {
                self.running = false;
                if report.success {
                    self.progress = 100.0;
                    let path = report
                        .output_path
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default();
                    self.status = format!(
                        "Done in {:.1}s (download {:.1}s, encode {:.1}s). Saved: {}",
                        report.timing.total_seconds,
                        report.timing.download_seconds,
                        report.timing.encode_seconds,
                        path
                    );
                } else {
                    // Bar drops back to zero so a stale percent never
                    // outlives a failed run
                    self.progress = 0.0;
                    let error = report.error.unwrap_or_else(|| "Unknown error".to_string());
                    self.status = format!("Failed: {}", error);
                    self.append_log(&format!("[ERROR] {}", error));
                }
            }
        }
    }

    fn append_log(&mut self, line: &str) {
        self.log.push(line.to_string());
        if self.log.len() > LOG_CAP {
            let drop = self.log.len() - LOG_CAP;
            self.log.drain(..drop);
        }
    }

    fn can_start(&self) -> bool {
        !self.running
            && !self.url.trim().is_empty()
            && !self.start_text.trim().is_empty()
            && !self.end_text.trim().is_empty()
            && !self.output_dir.trim().is_empty()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let url_row = row![
            text("Video URL").width(120),
            text_input("https://...", &self.url).on_input(Message::UrlChanged),
        ]
        .spacing(10);

        let times_row = row![
            text("Start (HH:MM:SS)").width(120),
            text_input("00:00:00", &self.start_text).on_input(Message::StartChanged),
            text("End").width(40),
            text_input("00:00:30", &self.end_text).on_input(Message::EndChanged),
        ]
        .spacing(10);

        let caption_row = row![
            text("Caption").width(120),
            text_input("optional", &self.caption).on_input(Message::CaptionChanged),
        ]
        .spacing(10);

        let output_row = row![
            text("Output folder").width(120),
            text_input("", &self.output_dir).on_input(Message::OutputChanged),
            button("Browse...").on_press(Message::BrowseOutput),
        ]
        .spacing(10);

        let start_button = button(if self.running {
            "Working..."
        } else {
            "Download Clip"
        })
        .on_press_maybe(self.can_start().then_some(Message::StartClip));

        let log_view = scrollable(
            column(
                self.log
                    .iter()
                    .map(|line| text(line).size(12).into())
                    .collect::<Vec<Element<'_, Message>>>(),
            )
            .spacing(2),
        )
        .height(Fill);

        let content = column![
            url_row,
            times_row,
            caption_row,
            output_row,
            start_button,
            progress_bar(0.0..=100.0, self.progress),
            text(&self.status),
            log_view,
        ]
        .spacing(12)
        .padding(16);

        container(content).width(Fill).height(Fill).into()
    }
}

/// Parse both boundary fields, with a user-facing error message.
fn parse_range(start: &str, end: &str) -> Result<(Timestamp, Timestamp), String> {
    let start: Timestamp = start
        .trim()
        .parse()
        .map_err(|_| format!("Bad start time '{}': use HH:MM:SS", start.trim()))?;
    let end: Timestamp = end
        .trim()
        .parse()
        .map_err(|_| format!("Bad end time '{}': use HH:MM:SS", end.trim()))?;
    Ok((start, end))
}

/// Empty or whitespace-only caption fields mean "no caption".
fn caption_or_none(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_accepts_valid_fields() {
        let (start, end) = parse_range("00:00:00", "00:00:30").unwrap();
        assert_eq!(start.total_seconds(), 0);
        assert_eq!(end.total_seconds(), 30);
    }

    #[test]
    fn parse_range_reports_which_field_is_bad() {
        let err = parse_range("oops", "00:00:30").unwrap_err();
        assert!(err.contains("start"));

        let err = parse_range("00:00:00", "99").unwrap_err();
        assert!(err.contains("end"));
    }

    #[test]
    fn reversed_range_is_accepted_here() {
        // Delegated to the encoder, same as the core library
        assert!(parse_range("00:02:00", "00:01:00").is_ok());
    }

    #[test]
    fn blank_caption_becomes_none() {
        assert_eq!(caption_or_none(""), None);
        assert_eq!(caption_or_none("   "), None);
        assert_eq!(caption_or_none(" My Clip "), Some("My Clip".to_string()));
    }
}
