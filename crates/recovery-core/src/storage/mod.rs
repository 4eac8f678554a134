mod config;
mod store;

pub use config::{CatalogConfig, Config, HistoryConfig, QuotaConfig, RecommendConfig, ReportConfig};
pub use store::{JsonFileStore, MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Environment variable that selects the development data directory.
pub const ENV_VAR: &str = "RECOVERY_ENV";

/// Environment variable that overrides the data directory outright.
pub const DATA_DIR_VAR: &str = "RECOVERY_DATA_DIR";

/// Returns `~/.config/recovery-routine[-dev]/` based on RECOVERY_ENV.
///
/// Set RECOVERY_ENV=dev to use the development data directory, or
/// RECOVERY_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(DATA_DIR_VAR) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("recovery-routine-dev")
            } else {
                base_dir.join("recovery-routine")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
