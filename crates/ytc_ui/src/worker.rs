//! Background clip worker.
//!
//! The run executes on a blocking task so the UI thread never waits on
//! a subprocess. Progress, log lines, and the terminal report flow back
//! over a channel consumed as an iced stream; the update loop is the
//! only writer to UI state.

use futures_util::{SinkExt, Stream};

use ytc_core::config::Settings;
use ytc_core::logging::GuiLogCallback;
use ytc_core::models::{ClipRequest, JobTiming, RunReport};
use ytc_core::orchestrator::{ClipRunner, ProgressCallback};

/// Events the worker sends to the UI.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Overall progress update (0-100) with a status message.
    Progress { percent: u32, message: String },
    /// One log line from the run.
    Log(String),
    /// The run finished.
    Finished(RunReport),
}

/// Run one clip request in the background, yielding events as they occur.
pub fn run_clip(settings: Settings, request: ClipRequest) -> impl Stream<Item = WorkerEvent> {
    iced::stream::channel(
        100,
        |mut output: iced::futures::channel::mpsc::Sender<WorkerEvent>| async move {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<WorkerEvent>();

            let handle = tokio::task::spawn_blocking(move || {
                let log_tx = tx.clone();
                let log_callback: GuiLogCallback = Box::new(move |line| {
                    let _ = log_tx.send(WorkerEvent::Log(line.to_string()));
                });

                let progress_tx = tx.clone();
                let progress_callback: ProgressCallback =
                    Box::new(move |_step, percent, message| {
                        let _ = progress_tx.send(WorkerEvent::Progress {
                            percent,
                            message: message.to_string(),
                        });
                    });

                let log_dir = settings.paths.logs_folder.clone();
                let runner = ClipRunner::new(settings, log_dir);
                runner.run(&request, Some(log_callback), Some(progress_callback))
                // tx and its clones drop here, closing the channel
            });

            while let Some(event) = rx.recv().await {
                let _ = output.send(event).await;
            }

            let report = match handle.await {
                Ok(report) => report,
                Err(e) => RunReport::failure(
                    format!("Worker task failed: {}", e),
                    JobTiming::default(),
                    None,
                ),
            };
            let _ = output.send(WorkerEvent::Finished(report)).await;
        },
    )
}
