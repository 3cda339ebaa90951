mod config;

pub use config::{Config, ExerciseConfig, WorkoutConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/interval[-dev]/` based on INTERVAL_ENV.
///
/// Set INTERVAL_ENV=dev to use the development directory. The directory is
/// not created; nothing is ever written there.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::DirUnavailable("home directory not found".to_string()))?
        .join(".config");

    let env = std::env::var("INTERVAL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("interval-dev")
    } else {
        base_dir.join("interval")
    };
    Ok(dir)
}
