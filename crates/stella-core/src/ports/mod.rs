//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or `tokio::process` types in any signature
//! - Probe ports never fail outward; they downgrade to "absent"
//! - Chat and storage ports return typed errors for the services to classify

pub mod chat;
pub mod memory_store;
pub mod settings_repository;
pub mod system_probe;

use thiserror::Error;

pub use chat::{ChatError, ChatPort};
pub use memory_store::{MemoryError, MemoryStore};
pub use settings_repository::SettingsRepository;
pub use system_probe::{CommandOutput, CommandRunner, ProbeError, ProbeResult, SystemProbePort};

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Storage backend error (filesystem).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored values failed validation.
    #[error(transparent)]
    Invalid(#[from] crate::settings::SettingsError),
}
