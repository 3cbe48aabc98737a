pub mod config;
pub mod logger;
pub mod settings_toml;
pub mod tempfiles;

pub use config::*;
pub use logger::setup_logging;
pub use tempfiles::{replace_via_temp, temp_path_for};
