//! Ollama REST request and response bodies.

use serde::{Deserialize, Serialize};

use stella_core::{ChatMessage, InferenceOptions};

/// Body of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub options: &'a InferenceOptions,
    pub stream: bool,
}

/// Non-streaming `POST /api/chat` response. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

/// `GET /api/tags` response.
#[derive(Debug, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
