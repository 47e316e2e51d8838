//! Ollama adapter for the chat port.

mod client;
mod wire;

pub use client::{OllamaClient, fast_models, normalize_host};
