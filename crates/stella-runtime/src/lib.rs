//! Adapters for stella: diagnostic-command probes, runtime configuration,
//! the Ollama HTTP client and file-backed stores.

pub mod configurator;
pub mod memory_store;
pub mod ollama;
pub mod settings_store;
pub mod system;

pub use configurator::{ConfiguratorError, RuntimeConfigurator, apply_to_process};
pub use memory_store::JsonMemoryStore;
pub use ollama::{OllamaClient, fast_models};
pub use settings_store::JsonSettingsRepository;
pub use system::{HardwareProbe, ProcessCommandRunner};
