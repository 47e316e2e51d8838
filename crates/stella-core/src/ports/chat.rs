//! Chat runtime port.
//!
//! The chat-completion call is an opaque request/response capability:
//! one model id, an ordered message list and an option set in, one reply
//! out. Every failure is a [`ChatError`]; the model selector decides what
//! is fatal.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChatMessage, ChatReply, InferenceOptions};

/// Errors returned by a chat runtime for a single request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The runtime is not reachable (not started, wrong host).
    #[error("Model runtime unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete within the configured timeout.
    #[error("Chat request timed out after {0}s")]
    Timeout(u64),

    /// The runtime does not have this model.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The runtime answered with an error status.
    #[error("Runtime returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be understood.
    #[error("Invalid runtime response: {0}")]
    InvalidResponse(String),
}

/// Port for issuing chat requests to the model runtime.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Send one non-streaming chat request.
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &InferenceOptions,
    ) -> Result<ChatReply, ChatError>;

    /// Names of the models installed in the runtime.
    async fn list_models(&self) -> Result<Vec<String>, ChatError>;
}
