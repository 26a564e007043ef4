pub mod chat;
pub mod config_cmd;
pub mod history;
pub mod skills;

use std::path::{Path, PathBuf};

use parley_config::AppConfig;
use parley_core::error::Error;

/// The config file in effect: the `--config` override or the default location.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Load configuration from the file in effect, with environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Error> {
    AppConfig::load_at(&config_file(path)).map_err(|e| Error::Config {
        message: e.to_string(),
    })
}
