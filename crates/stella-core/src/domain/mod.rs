//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (processes, filesystem, network).
//!
//! # Structure
//!
//! - `capabilities` - Hardware facts, the capability model and sizing policy
//! - `inference` - Sampling defaults and the per-request option builder
//! - `chat` - Chat message and reply types
//! - `memory` - The persisted conversation log document
//! - `environment` - Environment variable effects of runtime configuration
//! - `presence` - Idle status and greeting heuristics

pub mod capabilities;
pub mod chat;
pub mod environment;
pub mod inference;
pub mod memory;
pub mod presence;

pub use capabilities::{
    BATCH_SIZE_TIERS, CPU_BATCH_SIZE, CapabilityModel, DEFAULT_CONTEXT_SIZE, DetectedGpu,
    GpuMemory, GpuType, HardwareFacts, MAX_CPU_THREADS, MemoryUnit, PerformanceProfile,
    batch_size_for_memory, clamp_cpu_threads,
};
pub use chat::{ChatMessage, ChatReply, MessageRole};
pub use environment::EnvironmentEffects;
pub use inference::{GPU_LAYERS_ALL, InferenceOptions, OptionsBuilder, SamplingConfig};
pub use memory::ConversationLog;
pub use presence::{greeting_for_hour, idle_status};
