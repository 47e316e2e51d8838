//! Model selector - finds a candidate model that answers.
//!
//! Candidates are tried in list order. A failing candidate is logged and
//! skipped; the first reply wins and becomes the confirmed model, which is
//! tried first on every later turn.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ChatMessage, ChatReply, InferenceOptions};
use crate::ports::ChatPort;
use crate::settings::DEFAULT_SLOW_RESPONSE_SECS;

/// Shown to the user when no candidate answered.
pub const EXHAUSTED_MESSAGE: &str = "I'm having trouble connecting to the AI model. \
Please make sure Ollama is running with 'ollama serve' and pull a model with \
'ollama pull llama3.2:3b', then try again.";

/// Every candidate failed.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{message}")]
    Exhausted {
        /// Remediation text suitable for display.
        message: String,
        /// Number of candidates that were tried.
        attempted: usize,
    },
}

impl SelectionError {
    fn exhausted(attempted: usize) -> Self {
        Self::Exhausted {
            message: EXHAUSTED_MESSAGE.to_string(),
            attempted,
        }
    }

    /// The user-facing remediation text.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Exhausted { message, .. } => message,
        }
    }
}

/// A successful reply and where it came from.
#[derive(Debug, Clone)]
pub struct Selection {
    pub reply: ChatReply,
    pub model: String,
    pub elapsed: Duration,
    /// True when this turn confirmed a model different from the previous one.
    pub newly_confirmed: bool,
    /// Latency hint, present only for slow CPU-only replies.
    pub hint: Option<String>,
}

impl Selection {
    /// Reply text with the latency hint appended, if any.
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{}\n\n{hint}", self.reply.content),
            None => self.reply.content.clone(),
        }
    }
}

/// Sticky fallback over a list of candidate models.
pub struct ModelSelector {
    chat: Arc<dyn ChatPort>,
    confirmed_model: Option<String>,
    slow_response_hint: bool,
    slow_threshold: Duration,
}

impl ModelSelector {
    pub fn new(chat: Arc<dyn ChatPort>) -> Self {
        Self {
            chat,
            confirmed_model: None,
            slow_response_hint: false,
            slow_threshold: Duration::from_secs(DEFAULT_SLOW_RESPONSE_SECS),
        }
    }

    /// Enable the latency hint (used when no GPU is available).
    #[must_use]
    pub const fn with_slow_response_hint(mut self, enabled: bool, threshold: Duration) -> Self {
        self.slow_response_hint = enabled;
        self.slow_threshold = threshold;
        self
    }

    /// The model that answered most recently, if any.
    pub fn confirmed_model(&self) -> Option<&str> {
        self.confirmed_model.as_deref()
    }

    /// Send `messages` to the first candidate that answers.
    pub async fn respond(
        &mut self,
        candidates: &[String],
        messages: &[ChatMessage],
        options: &InferenceOptions,
    ) -> Result<Selection, SelectionError> {
        let mut attempted = 0;

        if let Some(confirmed) = self.confirmed_model.clone() {
            attempted += 1;
            if let Some(selection) = self.attempt(&confirmed, messages, options).await {
                return Ok(selection);
            }
        }

        for model in candidates {
            if self.confirmed_model.as_deref() == Some(model.as_str()) {
                continue;
            }
            attempted += 1;
            if let Some(selection) = self.attempt(model, messages, options).await {
                return Ok(selection);
            }
        }

        Err(SelectionError::exhausted(attempted))
    }

    async fn attempt(
        &mut self,
        model: &str,
        messages: &[ChatMessage],
        options: &InferenceOptions,
    ) -> Option<Selection> {
        let started = Instant::now();
        match self.chat.chat(model, messages, options).await {
            Ok(reply) => {
                let elapsed = started.elapsed();
                let newly_confirmed = self.confirmed_model.as_deref() != Some(model);
                if newly_confirmed {
                    info!(model, "Confirmed working model");
                    self.confirmed_model = Some(model.to_string());
                }
                let hint = self.latency_hint(model, elapsed);
                Some(Selection {
                    reply,
                    model: model.to_string(),
                    elapsed,
                    newly_confirmed,
                    hint,
                })
            }
            Err(e) => {
                debug!(model, error = %e, "Candidate model failed");
                None
            }
        }
    }

    fn latency_hint(&self, model: &str, elapsed: Duration) -> Option<String> {
        (self.slow_response_hint && elapsed > self.slow_threshold).then(|| {
            format!(
                "(Response took {:.1}s using {model} - consider using 'ollama pull llama3.2:3b' for faster responses)",
                elapsed.as_secs_f64()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Answers for models in `working`, fails for everything else, records calls.
    struct ScriptedChat {
        working: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(working: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                working: Mutex::new(working.iter().map(ToString::to_string).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn break_model(&self, model: &str) {
            self.working.lock().unwrap().remove(model);
        }
    }

    #[async_trait]
    impl ChatPort for ScriptedChat {
        async fn chat(
            &self,
            model: &str,
            _messages: &[ChatMessage],
            _options: &InferenceOptions,
        ) -> Result<ChatReply, ChatError> {
            self.calls.lock().unwrap().push(model.to_string());
            if self.working.lock().unwrap().contains(model) {
                Ok(ChatReply {
                    content: format!("hello from {model}"),
                })
            } else {
                Err(ChatError::ModelNotFound(model.to_string()))
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, ChatError> {
            Ok(self.working.lock().unwrap().iter().cloned().collect())
        }
    }

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn options() -> InferenceOptions {
        crate::domain::OptionsBuilder::new()
            .with_seed(7)
            .build(&crate::domain::CapabilityModel::low_memory())
    }

    #[tokio::test]
    async fn test_falls_back_to_first_working_candidate() {
        let chat = ScriptedChat::new(&["b", "c"]);
        let mut selector = ModelSelector::new(chat.clone());

        let selection = selector
            .respond(&candidates(&["a", "b", "c"]), &[], &options())
            .await
            .unwrap();

        assert_eq!(selection.model, "b");
        assert!(selection.newly_confirmed);
        assert_eq!(chat.calls(), vec!["a", "b"]);
        assert_eq!(selector.confirmed_model(), Some("b"));
    }

    #[tokio::test]
    async fn test_first_candidate_short_circuits() {
        let chat = ScriptedChat::new(&["a", "b", "c"]);
        let mut selector = ModelSelector::new(chat.clone());

        let selection = selector
            .respond(&candidates(&["a", "b", "c"]), &[], &options())
            .await
            .unwrap();

        assert_eq!(selection.model, "a");
        assert_eq!(chat.calls(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_remediation() {
        let chat = ScriptedChat::new(&[]);
        let mut selector = ModelSelector::new(chat.clone());

        let err = selector
            .respond(&candidates(&["a", "b", "c"]), &[], &options())
            .await
            .unwrap_err();

        assert!(err.user_message().contains("ollama serve"));
        assert!(err.user_message().contains("ollama pull llama3.2:3b"));
        assert!(matches!(err, SelectionError::Exhausted { attempted: 3, .. }));
        assert_eq!(chat.calls(), vec!["a", "b", "c"]);
        assert_eq!(selector.confirmed_model(), None);
    }

    #[tokio::test]
    async fn test_confirmed_model_is_sticky() {
        let chat = ScriptedChat::new(&["a", "b", "c"]);
        let mut selector = ModelSelector::new(chat.clone());
        let list = candidates(&["c", "a", "b"]);

        // Confirm "b" via a first turn where it is the only answer.
        chat.break_model("c");
        chat.break_model("a");
        selector.respond(&list, &[], &options()).await.unwrap();
        assert_eq!(selector.confirmed_model(), Some("b"));

        chat.calls.lock().unwrap().clear();
        let second = selector.respond(&list, &[], &options()).await.unwrap();
        assert_eq!(second.model, "b");
        assert!(!second.newly_confirmed);
        assert_eq!(chat.calls(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_confirmed_failure_rescans_without_retrying_it() {
        let chat = ScriptedChat::new(&["a", "b"]);
        let mut selector = ModelSelector::new(chat.clone());
        let list = candidates(&["a", "b"]);

        selector.respond(&list, &[], &options()).await.unwrap();
        assert_eq!(selector.confirmed_model(), Some("a"));

        chat.break_model("a");
        chat.calls.lock().unwrap().clear();
        let selection = selector.respond(&list, &[], &options()).await.unwrap();

        assert_eq!(selection.model, "b");
        assert!(selection.newly_confirmed);
        assert_eq!(chat.calls(), vec!["a", "b"]);
        assert_eq!(selector.confirmed_model(), Some("b"));
    }

    #[tokio::test]
    async fn test_latency_hint_only_when_enabled() {
        let chat = ScriptedChat::new(&["slow"]);
        let mut selector =
            ModelSelector::new(chat.clone()).with_slow_response_hint(true, Duration::ZERO);
        let selection = selector
            .respond(&candidates(&["slow"]), &[], &options())
            .await
            .unwrap();
        let hint = selection.hint.clone().unwrap();
        assert!(hint.starts_with("(Response took "));
        assert!(hint.contains("using slow"));
        assert!(selection.display_text().ends_with(&hint));

        let mut quiet = ModelSelector::new(chat);
        let selection = quiet
            .respond(&candidates(&["slow"]), &[], &options())
            .await
            .unwrap();
        assert!(selection.hint.is_none());
        assert_eq!(selection.display_text(), "hello from slow");
    }
}
