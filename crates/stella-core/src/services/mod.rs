//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They don't know about concrete implementations.

mod companion;
mod memory;
mod model_selector;
mod settings_service;

pub use companion::{Companion, CompanionConfig, STELLA_PERSONA, TurnOutcome};
pub use memory::MemoryService;
pub use model_selector::{EXHAUSTED_MESSAGE, ModelSelector, Selection, SelectionError};
pub use settings_service::SettingsService;
