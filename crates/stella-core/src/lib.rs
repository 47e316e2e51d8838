//! Core domain for the stella terminal companion.
//!
//! This crate owns the capability model and its sizing policy, the
//! inference option builder, the model fallback selector and the
//! conversation memory service. Everything that touches processes,
//! the filesystem or the network is expressed as a port in [`ports`]
//! and implemented in `stella-runtime`.

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    BATCH_SIZE_TIERS, CPU_BATCH_SIZE, CapabilityModel, ChatMessage, ChatReply, ConversationLog,
    DEFAULT_CONTEXT_SIZE, DetectedGpu, EnvironmentEffects, GPU_LAYERS_ALL, GpuMemory, GpuType,
    HardwareFacts, InferenceOptions, MAX_CPU_THREADS, MemoryUnit, MessageRole, OptionsBuilder,
    PerformanceProfile, SamplingConfig, batch_size_for_memory, clamp_cpu_threads, greeting_for_hour,
    idle_status,
};
pub use ports::{
    ChatError, ChatPort, CommandOutput, CommandRunner, MemoryError, MemoryStore, ProbeError,
    ProbeResult, RepositoryError, SettingsRepository, SystemProbePort,
};
pub use services::{
    Companion, CompanionConfig, EXHAUSTED_MESSAGE, MemoryService, ModelSelector, STELLA_PERSONA,
    Selection, SelectionError, SettingsService, TurnOutcome,
};
pub use settings::{
    DEFAULT_CANDIDATE_MODELS, DEFAULT_CHAT_TIMEOUT_SECS, DEFAULT_OLLAMA_HOST, Settings,
    SettingsError, SettingsUpdate, parse_setting, validate_settings,
};

// Re-export path utilities
pub use paths::{PathError, ResolvedPaths, data_root, runtime_config_path};
