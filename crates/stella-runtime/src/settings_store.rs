//! JSON file implementation of the settings repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use stella_core::ports::{RepositoryError, SettingsRepository};
use stella_core::Settings;

/// Settings stored as pretty JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| RepositoryError::Serialization(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                Ok(Settings::with_defaults())
            }
            Err(e) => Err(RepositoryError::Storage(e.to_string())),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        let body = serde_json::to_string_pretty(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, body)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(temp.path().join("settings.json"));
        assert_eq!(repo.load().await.unwrap(), Settings::with_defaults());
    }

    #[tokio::test]
    async fn test_round_trip_and_partial_file() {
        let temp = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(temp.path().join("settings.json"));

        let settings = Settings {
            chat_timeout_secs: Some(30),
            ..Settings::with_defaults()
        };
        repo.save(&settings).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), settings);

        std::fs::write(repo.path(), r#"{"history_window": 4}"#).unwrap();
        let partial = repo.load().await.unwrap();
        assert_eq!(partial.history_window, Some(4));
        assert_eq!(partial.ollama_host, None);
    }

    #[tokio::test]
    async fn test_garbage_is_an_error() {
        let temp = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(temp.path().join("settings.json"));
        std::fs::write(repo.path(), "garbage").unwrap();
        assert!(matches!(
            repo.load().await,
            Err(RepositoryError::Serialization(_))
        ));
    }
}
