pub mod config;
pub mod logger;
pub mod settings_toml;

pub use config::*;
pub use logger::setup_logging;
pub use settings_toml::{SettingsToml, apply_settings_to_config, load_settings_toml};
