//! Settings domain types and validation.
//!
//! This module contains the persisted user settings. These are pure domain
//! types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::SamplingConfig;

/// Default address of the local model runtime.
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

/// Default timeout for a single chat request, in seconds.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

/// Number of recent log entries sent with every request.
pub const DEFAULT_HISTORY_WINDOW: usize = 8;

/// A journal entry is written each time the log length is a multiple of this.
pub const DEFAULT_JOURNAL_INTERVAL: usize = 10;

/// Latency above which a CPU-only user is told to pull a smaller model.
pub const DEFAULT_SLOW_RESPONSE_SECS: u64 = 15;

/// Candidate models, tried in order until one answers.
pub const DEFAULT_CANDIDATE_MODELS: &[&str] = &[
    "llama3.2:3b",
    "qwen2.5:7b",
    "phi3.5:3.8b",
    "llama3:8b",
    "llama3",
    "llama2:7b",
    "llama2",
];

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the model runtime.
    pub ollama_host: Option<String>,

    /// Per-request chat timeout in seconds.
    pub chat_timeout_secs: Option<u64>,

    /// Ordered fallback list of model identifiers.
    pub candidate_models: Option<Vec<String>>,

    /// Number of log entries included in each prompt.
    pub history_window: Option<usize>,

    /// Journal every N log entries.
    pub journal_interval: Option<usize>,

    /// Slow-response hint threshold in seconds.
    pub slow_response_secs: Option<u64>,

    /// Sampling overrides applied on top of the built-in defaults.
    pub sampling: Option<SamplingConfig>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            ollama_host: Some(DEFAULT_OLLAMA_HOST.to_string()),
            chat_timeout_secs: Some(DEFAULT_CHAT_TIMEOUT_SECS),
            candidate_models: Some(
                DEFAULT_CANDIDATE_MODELS
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
            history_window: Some(DEFAULT_HISTORY_WINDOW),
            journal_interval: Some(DEFAULT_JOURNAL_INTERVAL),
            slow_response_secs: Some(DEFAULT_SLOW_RESPONSE_SECS),
            sampling: None,
        }
    }

    #[must_use]
    pub fn effective_ollama_host(&self) -> &str {
        self.ollama_host.as_deref().unwrap_or(DEFAULT_OLLAMA_HOST)
    }

    #[must_use]
    pub fn effective_chat_timeout_secs(&self) -> u64 {
        self.chat_timeout_secs.unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS)
    }

    /// Candidate list, falling back to the built-in list when unset or empty.
    #[must_use]
    pub fn effective_candidate_models(&self) -> Vec<String> {
        match &self.candidate_models {
            Some(models) if !models.is_empty() => models.clone(),
            _ => DEFAULT_CANDIDATE_MODELS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn effective_history_window(&self) -> usize {
        self.history_window.unwrap_or(DEFAULT_HISTORY_WINDOW)
    }

    #[must_use]
    pub fn effective_journal_interval(&self) -> usize {
        self.journal_interval.unwrap_or(DEFAULT_JOURNAL_INTERVAL)
    }

    #[must_use]
    pub fn effective_slow_response_secs(&self) -> u64 {
        self.slow_response_secs.unwrap_or(DEFAULT_SLOW_RESPONSE_SECS)
    }

    /// Sampling defaults with any stored overrides applied.
    #[must_use]
    pub fn effective_sampling(&self) -> SamplingConfig {
        let mut sampling = self.sampling.clone().unwrap_or_default();
        sampling.merge_with(&SamplingConfig::with_hardcoded_defaults());
        sampling
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref host) = other.ollama_host {
            self.ollama_host.clone_from(host);
        }
        if let Some(ref timeout) = other.chat_timeout_secs {
            self.chat_timeout_secs = *timeout;
        }
        if let Some(ref models) = other.candidate_models {
            self.candidate_models.clone_from(models);
        }
        if let Some(ref window) = other.history_window {
            self.history_window = *window;
        }
        if let Some(ref interval) = other.journal_interval {
            self.journal_interval = *interval;
        }
        if let Some(ref secs) = other.slow_response_secs {
            self.slow_response_secs = *secs;
        }
        if let Some(ref sampling) = other.sampling {
            self.sampling.clone_from(sampling);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub ollama_host: Option<Option<String>>,
    pub chat_timeout_secs: Option<Option<u64>>,
    pub candidate_models: Option<Option<Vec<String>>>,
    pub history_window: Option<Option<usize>>,
    pub journal_interval: Option<Option<usize>>,
    pub slow_response_secs: Option<Option<u64>>,
    pub sampling: Option<Option<SamplingConfig>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Ollama host must start with http:// or https://, got {0:?}")]
    InvalidHost(String),

    #[error("Chat timeout must be between 1 and 3600 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("Candidate model list cannot contain empty names")]
    EmptyModelName,

    #[error("History window must be between 1 and 100, got {0}")]
    InvalidHistoryWindow(usize),

    #[error("Journal interval must be at least 1, got {0}")]
    InvalidJournalInterval(usize),

    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("Top-p must be between 0.0 and 1.0, got {0}")]
    InvalidTopP(f32),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref host) = settings.ollama_host {
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(SettingsError::InvalidHost(host.clone()));
        }
    }

    if let Some(timeout) = settings.chat_timeout_secs {
        if !(1..=3600).contains(&timeout) {
            return Err(SettingsError::InvalidTimeout(timeout));
        }
    }

    if settings
        .candidate_models
        .as_ref()
        .is_some_and(|models| models.iter().any(|m| m.trim().is_empty()))
    {
        return Err(SettingsError::EmptyModelName);
    }

    if let Some(window) = settings.history_window {
        if !(1..=100).contains(&window) {
            return Err(SettingsError::InvalidHistoryWindow(window));
        }
    }

    if let Some(interval) = settings.journal_interval {
        if interval == 0 {
            return Err(SettingsError::InvalidJournalInterval(interval));
        }
    }

    if let Some(ref sampling) = settings.sampling {
        if let Some(temp) = sampling.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(SettingsError::InvalidTemperature(temp));
            }
        }
        if let Some(top_p) = sampling.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(SettingsError::InvalidTopP(top_p));
            }
        }
    }

    Ok(())
}

/// Build a single-field update from a `key value` pair given on the command line.
///
/// Sampling keys update only their own field, leaving other overrides intact.
pub fn parse_setting(
    current: &Settings,
    key: &str,
    value: &str,
) -> Result<SettingsUpdate, SettingsError> {
    fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
        value.trim().parse().map_err(|_| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    let mut update = SettingsUpdate::default();
    let mut sampling = current.sampling.clone().unwrap_or_default();

    match key {
        "ollama_host" => update.ollama_host = Some(Some(value.trim().to_string())),
        "chat_timeout_secs" => update.chat_timeout_secs = Some(Some(number(key, value)?)),
        "candidate_models" => {
            let models = value
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            update.candidate_models = Some(Some(models));
        }
        "history_window" => update.history_window = Some(Some(number(key, value)?)),
        "journal_interval" => update.journal_interval = Some(Some(number(key, value)?)),
        "slow_response_secs" => update.slow_response_secs = Some(Some(number(key, value)?)),
        "temperature" => {
            sampling.temperature = Some(number(key, value)?);
            update.sampling = Some(Some(sampling));
        }
        "top_p" => {
            sampling.top_p = Some(number(key, value)?);
            update.sampling = Some(Some(sampling));
        }
        "top_k" => {
            sampling.top_k = Some(number(key, value)?);
            update.sampling = Some(Some(sampling));
        }
        "repeat_penalty" => {
            sampling.repeat_penalty = Some(number(key, value)?);
            update.sampling = Some(Some(sampling));
        }
        other => return Err(SettingsError::UnknownKey(other.to_string())),
    }

    Ok(update)
}
