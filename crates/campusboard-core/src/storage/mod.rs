pub mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::{ConfigError, CoreError};

/// Returns `~/.config/campusboard[-dev]/` based on CAMPUSBOARD_ENV.
///
/// Set CAMPUSBOARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| ConfigError::NoDataDir("no home directory".into()))?;

    let env = std::env::var("CAMPUSBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("campusboard-dev")
    } else {
        base_dir.join("campusboard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
