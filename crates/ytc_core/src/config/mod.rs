//! Configuration management.
//!
//! Settings live in a TOML file (`.config/settings.toml` by default)
//! split into sections that can be updated independently and are always
//! written atomically.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, EncodeSettings, FetchSettings, LoggingSettings, PathSettings, Settings,
};
