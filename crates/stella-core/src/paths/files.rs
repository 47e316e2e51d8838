//! Files kept under the data root.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::data_root;

/// Conversation log document.
pub const MEMORY_FILE: &str = "memory.json";

/// Append-only journal.
pub const JOURNAL_FILE: &str = "journal.txt";

/// Persisted settings.
pub const SETTINGS_FILE: &str = "settings.json";

/// Environment overrides loaded at startup.
pub const ENV_FILE: &str = ".env";

/// Where the conversation log lives under `root`.
pub fn memory_path_in(root: &Path) -> PathBuf {
    root.join(MEMORY_FILE)
}

pub fn journal_path_in(root: &Path) -> PathBuf {
    root.join(JOURNAL_FILE)
}

pub fn settings_path_in(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

/// Location of the `.env` file that stores user overrides.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(ENV_FILE))
}
