//! Conversation log document.
//!
//! Mirrors the on-disk `memory.json` layout:
//! `{"log": [{"role": ..., "content": ...}], "user_preferences": {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;

/// Append-only conversation history plus free-form user preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationLog {
    pub log: Vec<ChatMessage>,
    pub user_preferences: BTreeMap<String, serde_json::Value>,
}

impl ConversationLog {
    pub fn push(&mut self, message: ChatMessage) {
        self.log.push(message);
    }

    /// The last `limit` entries, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> &[ChatMessage] {
        let start = self.log.len().saturating_sub(limit);
        &self.log[start..]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Drop the oldest entries so at most `max_entries` remain.
    pub fn truncate_front(&mut self, max_entries: usize) {
        if self.log.len() > max_entries {
            let excess = self.log.len() - max_entries;
            self.log.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(n: usize) -> ConversationLog {
        let mut log = ConversationLog::default();
        for i in 0..n {
            log.push(ChatMessage::user(format!("m{i}")));
        }
        log
    }

    #[test]
    fn test_recent_returns_suffix() {
        let log = log_of(12);
        let recent = log.recent(8);
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].content, "m4");
        assert_eq!(recent[7].content, "m11");
        assert_eq!(log_of(3).recent(8).len(), 3);
    }

    #[test]
    fn test_truncate_front_keeps_newest() {
        let mut log = log_of(14);
        log.truncate_front(10);
        assert_eq!(log.len(), 10);
        assert_eq!(log.log[0].content, "m4");
    }

    #[test]
    fn test_missing_preferences_deserialize() {
        let log: ConversationLog =
            serde_json::from_str(r#"{"log":[{"role":"assistant","content":"hey"}]}"#).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.user_preferences.is_empty());
    }
}
