//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Path resolution and the JSON settings/memory stores
//! - The hardware probe (via stella-runtime)
//! - The Ollama chat client
//!
//! Command handlers receive the composed `CliContext`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use stella_core::ports::ChatPort;
use stella_core::services::SettingsService;
use stella_core::paths::verify_writable;
use stella_core::{ResolvedPaths, Settings, validate_settings};
use stella_runtime::system::ProcessCommandRunner;
use stella_runtime::{HardwareProbe, JsonMemoryStore, JsonSettingsRepository, OllamaClient};

use crate::error::CliError;

/// Environment variable overriding the model runtime host.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Data directory override (`--data-dir`).
    pub data_dir: Option<String>,
    /// Runtime host override, taking precedence over settings.
    pub ollama_host: Option<String>,
}

impl CliConfig {
    /// Read the host override from the environment.
    pub fn from_env(data_dir: Option<String>) -> Self {
        Self {
            data_dir,
            ollama_host: std::env::var(OLLAMA_HOST_ENV)
                .ok()
                .filter(|host| !host.trim().is_empty()),
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub paths: ResolvedPaths,
    /// Settings service over `settings.json`.
    pub settings: SettingsService,
    /// Settings as loaded at startup.
    pub current: Settings,
    pub probe: Arc<HardwareProbe<ProcessCommandRunner>>,
    pub chat: Arc<OllamaClient>,
    pub memory_store: Arc<JsonMemoryStore>,
}

impl CliContext {
    /// The chat client as a port, for the model selector.
    pub fn chat_port(&self) -> Arc<dyn ChatPort> {
        Arc::clone(&self.chat) as Arc<dyn ChatPort>
    }
}

/// Bootstrap the CLI application.
///
/// Settings that fail to load or validate are reported and replaced by
/// defaults so that `config reset` can still repair them.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let paths = ResolvedPaths::resolve_with_data_dir(config.data_dir.as_deref())
        .map_err(CliError::from)?;
    debug!(data_root = %paths.data_root.display(), "Resolved paths");
    if let Err(e) = verify_writable(&paths.data_root) {
        warn!(error = %e, "Data directory is not writable; memory will not persist");
    }

    let settings = SettingsService::new(Arc::new(JsonSettingsRepository::new(
        paths.settings_path.clone(),
    )));
    let current = match settings.get().await {
        Ok(current) => match validate_settings(&current) {
            Ok(()) => current,
            Err(e) => {
                warn!(error = %e, "Stored settings are invalid, using defaults");
                Settings::with_defaults()
            }
        },
        Err(e) => {
            warn!(error = %e, "Could not load settings, using defaults");
            Settings::with_defaults()
        }
    };

    let host = config
        .ollama_host
        .as_deref()
        .unwrap_or_else(|| current.effective_ollama_host());
    let chat = OllamaClient::new(
        host,
        Duration::from_secs(current.effective_chat_timeout_secs()),
    )
    .map_err(CliError::from)?;
    debug!(host = chat.base_url(), "Model runtime client ready");

    let memory_store = JsonMemoryStore::new(paths.memory_path.clone(), paths.journal_path.clone());

    Ok(CliContext {
        settings,
        current,
        probe: Arc::new(
            HardwareProbe::system().with_runtime_config(paths.runtime_config_path.clone()),
        ),
        chat: Arc::new(chat),
        memory_store: Arc::new(memory_store),
        paths,
    })
}
