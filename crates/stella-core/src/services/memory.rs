//! Memory service - conversation log and journal orchestration.
//!
//! Holds the in-memory [`ConversationLog`] and writes it back through the
//! [`MemoryStore`] port after every mutation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ChatMessage, ConversationLog};
use crate::ports::{MemoryError, MemoryStore};

/// Service owning the conversation log.
pub struct MemoryService {
    store: Arc<dyn MemoryStore>,
    log: ConversationLog,
    max_entries: Option<usize>,
    recorded: usize,
}

impl MemoryService {
    /// Load the stored log. `max_entries` caps the log length (low profile).
    pub async fn load(store: Arc<dyn MemoryStore>, max_entries: Option<usize>) -> Self {
        let mut log = store.load().await;
        if let Some(max) = max_entries {
            log.truncate_front(max);
        }
        debug!(entries = log.len(), "Loaded conversation log");
        let recorded = log.len();
        Self {
            store,
            log,
            max_entries,
            recorded,
        }
    }

    /// Append one message and persist.
    ///
    /// Returns the number of entries recorded so far, counting those the
    /// length cap has since dropped. Without a cap this is the log length.
    pub async fn append(&mut self, message: ChatMessage) -> Result<usize, MemoryError> {
        self.log.push(message);
        if let Some(max) = self.max_entries {
            self.log.truncate_front(max);
        }
        self.recorded += 1;
        self.store.save(&self.log).await?;
        Ok(self.recorded)
    }

    /// The last `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> &[ChatMessage] {
        self.log.recent(limit)
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Record a user preference and persist.
    pub async fn update_user_preference(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), MemoryError> {
        self.log.user_preferences.insert(key.into(), value);
        self.store.save(&self.log).await
    }

    pub fn user_preference(&self, key: &str) -> Option<&serde_json::Value> {
        self.log.user_preferences.get(key)
    }

    /// Append a thought to the journal.
    pub async fn journal(&self, thought: &str) -> Result<(), MemoryError> {
        self.store.append_journal(thought).await
    }
}
