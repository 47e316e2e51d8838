//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call core services and format output for the terminal
//!
//! Handlers should NOT contain sizing, selection or memory policy.

pub mod chat;
pub mod config;
pub mod info;
pub mod models;
pub mod paths;
