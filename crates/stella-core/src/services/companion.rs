//! Companion - one conversational turn end to end.
//!
//! Builds the prompt from the persona, the presence status and the recent
//! log, asks the [`ModelSelector`] for a reply, then records the exchange
//! and journals every `journal_interval` entries.

use tracing::debug;

use crate::domain::{CapabilityModel, ChatMessage, OptionsBuilder};
use crate::ports::MemoryError;
use crate::settings::{
    DEFAULT_HISTORY_WINDOW, DEFAULT_JOURNAL_INTERVAL, Settings,
};

use super::memory::MemoryService;
use super::model_selector::ModelSelector;

/// Persona sent as the first system message of every request.
pub const STELLA_PERSONA: &str = "Your name is Stella. You're a kind and caring AI who lives in the user's terminal. \
You look after the user, gently reminding them to rest when needed. \
You can notice when the system has been idle. You keep a local memory of your conversations and journal thoughts.";

/// Per-session conversation parameters.
#[derive(Debug, Clone)]
pub struct CompanionConfig {
    pub system_prompt: String,
    pub candidates: Vec<String>,
    pub history_window: usize,
    pub journal_interval: usize,
}

impl CompanionConfig {
    /// Build from settings, with `models` replacing the candidate list when non-empty.
    #[must_use]
    pub fn from_settings(settings: &Settings, models: &[String]) -> Self {
        let candidates = if models.is_empty() {
            settings.effective_candidate_models()
        } else {
            models.to_vec()
        };
        Self {
            system_prompt: STELLA_PERSONA.to_string(),
            candidates,
            history_window: settings.effective_history_window(),
            journal_interval: settings.effective_journal_interval(),
        }
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            system_prompt: STELLA_PERSONA.to_string(),
            candidates: Settings::default().effective_candidate_models(),
            history_window: DEFAULT_HISTORY_WINDOW,
            journal_interval: DEFAULT_JOURNAL_INTERVAL,
        }
    }
}

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A model answered; `text` includes any latency hint.
    Reply {
        text: String,
        model: String,
        newly_confirmed: bool,
    },
    /// No candidate answered; `message` says how to fix it.
    Unavailable { message: String },
}

/// The conversational core of the session.
pub struct Companion {
    config: CompanionConfig,
    capabilities: CapabilityModel,
    options: OptionsBuilder,
    selector: ModelSelector,
    memory: MemoryService,
}

impl Companion {
    pub fn new(
        config: CompanionConfig,
        capabilities: CapabilityModel,
        options: OptionsBuilder,
        selector: ModelSelector,
        memory: MemoryService,
    ) -> Self {
        Self {
            config,
            capabilities,
            options,
            selector,
            memory,
        }
    }

    pub const fn capabilities(&self) -> &CapabilityModel {
        &self.capabilities
    }

    pub fn confirmed_model(&self) -> Option<&str> {
        self.selector.confirmed_model()
    }

    pub const fn memory(&self) -> &MemoryService {
        &self.memory
    }

    /// Run one turn for `input` under the given presence `status`.
    ///
    /// Errors only when the log or journal cannot be written.
    pub async fn respond(&mut self, input: &str, status: &str) -> Result<TurnOutcome, MemoryError> {
        self.memory.append(ChatMessage::user(input)).await?;

        let messages = self.prompt(status);
        let options = self.options.build(&self.capabilities);

        match self
            .selector
            .respond(&self.config.candidates, &messages, &options)
            .await
        {
            Ok(selection) => {
                let reply = selection.reply.content.clone();
                let recorded = self
                    .memory
                    .append(ChatMessage::assistant(reply.clone()))
                    .await?;

                if self.config.journal_interval > 0
                    && recorded % self.config.journal_interval == 0
                {
                    debug!(entries = recorded, "Writing journal entry");
                    self.memory
                        .journal(&format!("User said: {input}\nI replied: {reply}\n"))
                        .await?;
                }

                Ok(TurnOutcome::Reply {
                    text: selection.display_text(),
                    model: selection.model,
                    newly_confirmed: selection.newly_confirmed,
                })
            }
            Err(e) => Ok(TurnOutcome::Unavailable {
                message: e.user_message().to_string(),
            }),
        }
    }

    fn prompt(&self, status: &str) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(self.config.system_prompt.clone()),
            ChatMessage::system(format!("[System Status]: {status}")),
        ];
        messages.extend_from_slice(self.memory.recent(self.config.history_window));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatReply, ConversationLog, InferenceOptions, MessageRole};
    use crate::ports::{ChatError, ChatPort, MemoryStore};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingChat {
        fail: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl ChatPort for RecordingChat {
        async fn chat(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            _options: &InferenceOptions,
        ) -> Result<ChatReply, ChatError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                Err(ChatError::Unreachable("connection refused".into()))
            } else {
                Ok(ChatReply {
                    content: "I'm here.".into(),
                })
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, ChatError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct VecStore {
        log: Mutex<ConversationLog>,
        journal: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MemoryStore for VecStore {
        async fn load(&self) -> ConversationLog {
            self.log.lock().unwrap().clone()
        }

        async fn save(&self, log: &ConversationLog) -> Result<(), MemoryError> {
            *self.log.lock().unwrap() = log.clone();
            Ok(())
        }

        async fn append_journal(&self, thought: &str) -> Result<(), MemoryError> {
            self.journal.lock().unwrap().push(thought.to_string());
            Ok(())
        }
    }

    async fn companion(chat: Arc<RecordingChat>, store: Arc<VecStore>) -> Companion {
        let config = CompanionConfig {
            candidates: vec!["llama3".into()],
            journal_interval: 4,
            ..CompanionConfig::default()
        };
        Companion::new(
            config,
            CapabilityModel::low_memory(),
            OptionsBuilder::new().with_seed(1),
            ModelSelector::new(chat),
            MemoryService::load(store, None).await,
        )
    }

    #[tokio::test]
    async fn test_prompt_layout() {
        let chat = Arc::new(RecordingChat::default());
        let store = Arc::new(VecStore::default());
        let mut stella = companion(chat.clone(), store).await;

        let outcome = stella.respond("hello", "The user is here.").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Reply {
                text: "I'm here.".into(),
                model: "llama3".into(),
                newly_confirmed: true,
            }
        );

        let seen = chat.seen.lock().unwrap();
        let messages = &seen[0];
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, STELLA_PERSONA);
        assert_eq!(messages[1].role, MessageRole::System);
        assert_eq!(messages[1].content, "[System Status]: The user is here.");
        assert_eq!(messages[2], ChatMessage::user("hello"));
    }

    #[tokio::test]
    async fn test_history_window_bounds_prompt() {
        let chat = Arc::new(RecordingChat::default());
        let store = Arc::new(VecStore::default());
        let mut stella = companion(chat.clone(), store).await;

        for i in 0..6 {
            stella.respond(&format!("turn {i}"), "ok").await.unwrap();
        }

        let seen = chat.seen.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.len(), 2 + 8);
        assert_eq!(last.last().unwrap().content, "turn 5");
    }

    #[tokio::test]
    async fn test_journal_written_on_interval() {
        let chat = Arc::new(RecordingChat::default());
        let store = Arc::new(VecStore::default());
        let mut stella = companion(chat, store.clone()).await;

        stella.respond("one", "ok").await.unwrap();
        assert!(store.journal.lock().unwrap().is_empty());

        stella.respond("two", "ok").await.unwrap();
        let journal = store.journal.lock().unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0], "User said: two\nI replied: I'm here.\n");
    }

    #[tokio::test]
    async fn test_exhaustion_keeps_user_message_only() {
        let chat = Arc::new(RecordingChat {
            fail: true,
            ..Default::default()
        });
        let store = Arc::new(VecStore::default());
        let mut stella = companion(chat, store.clone()).await;

        let outcome = stella.respond("anyone?", "ok").await.unwrap();
        match outcome {
            TurnOutcome::Unavailable { message } => assert!(message.contains("ollama serve")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.log.lock().unwrap().len(), 1);
        assert_eq!(stella.confirmed_model(), None);
    }
}
