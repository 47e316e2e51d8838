//! HTTP client for a local Ollama server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use stella_core::ports::{ChatError, ChatPort};
use stella_core::{ChatMessage, ChatReply, InferenceOptions};

use super::wire::{ChatRequest, ChatResponse, ErrorBody, TagsResponse};

/// Timeout for the model listing call.
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// `ChatPort` over Ollama's REST API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client for `host` with a per-request chat timeout.
    pub fn new(host: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: normalize_host(host),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, model: &str, err: &reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            ChatError::Unreachable(format!("{}: {err}", self.base_url))
        } else if err.is_decode() {
            ChatError::InvalidResponse(err.to_string())
        } else {
            debug!(model, error = %err, "Chat request failed");
            ChatError::Unreachable(err.to_string())
        }
    }
}

/// Accept `host:port`, `http://host:port` or a trailing slash.
pub fn normalize_host(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[async_trait]
impl ChatPort for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &InferenceOptions,
    ) -> Result<ChatReply, ChatError> {
        let body = ChatRequest {
            model,
            messages,
            options,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(model, &e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(if status == StatusCode::NOT_FOUND {
                ChatError::ModelNotFound(model.to_string())
            } else {
                ChatError::Http {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.classify(model, &e))?;

        Ok(ChatReply {
            content: parsed.message.content,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.classify("", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Installed models that are small enough to answer quickly on CPU.
pub fn fast_models(models: &[String]) -> Vec<String> {
    models
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            ["7b", "3b", "1b"].iter().any(|size| lower.contains(size))
        })
        .cloned()
        .collect()
}
