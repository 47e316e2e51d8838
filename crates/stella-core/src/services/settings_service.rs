//! Settings service - orchestrates settings operations.

use crate::ports::{RepositoryError, SettingsRepository};
use crate::settings::{Settings, SettingsUpdate, validate_settings};
use std::sync::Arc;

/// Service for settings operations.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Get current settings.
    pub async fn get(&self) -> Result<Settings, RepositoryError> {
        self.repo.load().await
    }

    /// Update settings with partial changes.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, RepositoryError> {
        let mut current = self.repo.load().await?;
        current.merge(&update);
        validate_settings(&current)?;
        self.repo.save(&current).await?;
        Ok(current)
    }

    /// Replace stored settings with the defaults.
    pub async fn reset(&self) -> Result<Settings, RepositoryError> {
        let defaults = Settings::with_defaults();
        self.repo.save(&defaults).await?;
        Ok(defaults)
    }
}
