//! File-backed memory store: `memory.json` plus `journal.txt`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use stella_core::ConversationLog;
use stella_core::ports::{MemoryError, MemoryStore};

/// Stores the conversation log as pretty JSON and the journal as text.
#[derive(Debug, Clone)]
pub struct JsonMemoryStore {
    memory_path: PathBuf,
    journal_path: PathBuf,
}

impl JsonMemoryStore {
    pub fn new(memory_path: impl Into<PathBuf>, journal_path: impl Into<PathBuf>) -> Self {
        Self {
            memory_path: memory_path.into(),
            journal_path: journal_path.into(),
        }
    }

    pub fn memory_path(&self) -> &Path {
        &self.memory_path
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }
}

fn write_error(path: &Path, e: &std::io::Error) -> MemoryError {
    MemoryError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// One journal line: `[YYYY-MM-DD HH:MM] thought`.
pub fn journal_entry(timestamp: &str, thought: &str) -> String {
    format!("[{timestamp}] {thought}\n")
}

#[async_trait]
impl MemoryStore for JsonMemoryStore {
    async fn load(&self) -> ConversationLog {
        let raw = match fs::read_to_string(&self.memory_path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.memory_path.display(), error = %e, "No stored memory");
                return ConversationLog::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.memory_path.display(), error = %e, "Corrupt memory file, starting fresh");
            ConversationLog::default()
        })
    }

    async fn save(&self, log: &ConversationLog) -> Result<(), MemoryError> {
        let body = serde_json::to_string_pretty(log)
            .map_err(|e| MemoryError::Serialization(e.to_string()))?;
        if let Some(parent) = self.memory_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(parent, &e))?;
        }
        fs::write(&self.memory_path, body)
            .await
            .map_err(|e| write_error(&self.memory_path, &e))
    }

    async fn append_journal(&self, thought: &str) -> Result<(), MemoryError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)
            .await
            .map_err(|e| write_error(&self.journal_path, &e))?;
        file.write_all(journal_entry(&timestamp, thought).as_bytes())
            .await
            .map_err(|e| write_error(&self.journal_path, &e))
    }
}
