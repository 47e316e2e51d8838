//! Pure path resolver for testing and CLI introspection.
//!
//! Captures every resolved path in one call, for the `stella paths`
//! command and for wiring the stores at startup.

use std::path::PathBuf;

use super::ensure::ensure_directory;
use super::files::{ENV_FILE, journal_path_in, memory_path_in, settings_path_in};
use super::platform::{data_root, normalize_user_path, runtime_config_path};
use super::PathError;

/// All resolved paths captured in a single struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data
    pub data_root: PathBuf,
    /// Conversation log document
    pub memory_path: PathBuf,
    /// Append-only journal
    pub journal_path: PathBuf,
    /// Persisted settings
    pub settings_path: PathBuf,
    /// `.env` overrides
    pub env_file: PathBuf,
    /// The model runtime's configuration file
    pub runtime_config_path: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Self::resolve_with_data_dir(None)
    }

    /// Resolve with an explicit data directory override.
    ///
    /// Use this when `--data-dir` is passed; the directory is created if needed.
    pub fn resolve_with_data_dir(data_dir: Option<&str>) -> Result<Self, PathError> {
        let data_root = match data_dir {
            Some(raw) => {
                let path = normalize_user_path(raw)?;
                ensure_directory(&path)?;
                path
            }
            None => data_root()?,
        };

        Ok(Self {
            memory_path: memory_path_in(&data_root),
            journal_path: journal_path_in(&data_root),
            settings_path: settings_path_in(&data_root),
            env_file: data_root.join(ENV_FILE),
            runtime_config_path: runtime_config_path()?,
            data_root,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "memory_path = {}", self.memory_path.display())?;
        writeln!(f, "journal_path = {}", self.journal_path.display())?;
        writeln!(f, "settings_path = {}", self.settings_path.display())?;
        writeln!(f, "env_file = {}", self.env_file.display())?;
        write!(
            f,
            "runtime_config_path = {}",
            self.runtime_config_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};
    use crate::paths::platform::DATA_DIR_ENV;
    use tempfile::tempdir;

    #[test]
    fn resolve_returns_consistent_paths() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        let first = ResolvedPaths::resolve().expect("first resolve");
        let second = ResolvedPaths::resolve().expect("second resolve");

        assert_eq!(first, second, "path resolution should be deterministic");
        assert_eq!(first.memory_path, temp.path().join("memory.json"));
        assert_eq!(first.journal_path, temp.path().join("journal.txt"));
    }

    #[test]
    fn data_dir_override_wins() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let custom = temp.path().join("custom");

        let paths =
            ResolvedPaths::resolve_with_data_dir(Some(custom.to_string_lossy().as_ref())).unwrap();
        assert_eq!(paths.data_root, custom);
        assert!(custom.is_dir());
        assert_eq!(paths.settings_path, custom.join("settings.json"));
    }

    #[test]
    fn display_format_is_parseable() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        let output = ResolvedPaths::resolve().expect("resolve").to_string();
        for key in [
            "data_root = ",
            "memory_path = ",
            "journal_path = ",
            "settings_path = ",
            "env_file = ",
            "runtime_config_path = ",
        ] {
            assert!(output.contains(key), "missing {key}");
        }
    }
}
