//! Memory store port for the conversation log and journal.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ConversationLog;

/// Errors that can occur while persisting memory.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Failed to serialize memory: {0}")]
    Serialization(String),
}

/// Durable storage for the conversation log and the journal.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Load the stored log. A missing or unreadable document yields an empty log.
    async fn load(&self) -> ConversationLog;

    /// Replace the stored log with `log`.
    async fn save(&self, log: &ConversationLog) -> Result<(), MemoryError>;

    /// Append one timestamped entry to the journal.
    async fn append_journal(&self, thought: &str) -> Result<(), MemoryError>;
}
