pub mod config;
pub mod holiday_db;

pub use config::EngineConfig;
pub use holiday_db::{CachedHolidays, HolidayStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/fairhour[-dev]/` based on FAIRHOUR_ENV.
///
/// Set FAIRHOUR_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FAIRHOUR_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fairhour-dev")
    } else {
        base_dir.join("fairhour")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
