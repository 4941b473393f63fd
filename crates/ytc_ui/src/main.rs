//! ytclip-gui - desktop front-end for yt-clipper.

mod app;
mod worker;

use app::App;

use ytc_core::config::ConfigManager;
use ytc_core::logging::{init_tracing, LogLevel};

fn main() -> iced::Result {
    init_tracing(LogLevel::Info);

    let mut config = ConfigManager::new(ConfigManager::default_path());
    if let Err(e) = config.load_or_create() {
        tracing::warn!("Could not load configuration, using defaults: {}", e);
    }
    if let Err(e) = config.ensure_dirs_exist() {
        tracing::warn!("Could not create configured directories: {}", e);
    }

    let settings = config.settings().clone();

    iced::application(move || App::new(settings.clone()), App::update, App::view)
        .title("YT Clipper")
        .theme(App::theme)
        .window_size((620.0, 640.0))
        .run()
}
