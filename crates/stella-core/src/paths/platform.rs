//! Platform-specific path detection and resolution.

use std::env;
use std::fs;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STELLA_DATA_DIR";

/// Environment variable overriding the runtime configuration file location.
pub const RUNTIME_CONFIG_ENV: &str = "STELLA_OLLAMA_CONFIG";

/// Get the root directory for application data (memory, journal, settings).
///
/// Resolution order:
/// 1. `STELLA_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g., `~/.local/share/stella`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = if let Ok(path) = env::var(DATA_DIR_ENV) {
        normalize_user_path(&path)?
    } else {
        dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join("stella")
    };

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(root)
}

/// Location of the model runtime's own configuration file.
///
/// Resolution order:
/// 1. `STELLA_OLLAMA_CONFIG` environment variable
/// 2. `~/.ollama/config.json`
pub fn runtime_config_path() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(RUNTIME_CONFIG_ENV) {
        return normalize_user_path(&path);
    }

    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(".ollama").join("config.json"))
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
