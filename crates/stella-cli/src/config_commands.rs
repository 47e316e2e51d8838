//! Configuration management subcommands.

use clap::Subcommand;

/// Settings management commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current settings
    Show,
    /// Set one setting (e.g. `config set temperature 0.5`)
    Set {
        /// Setting name: ollama_host, chat_timeout_secs, candidate_models,
        /// history_window, journal_interval, slow_response_secs, temperature,
        /// top_p, top_k, repeat_penalty
        key: String,
        /// New value; candidate_models takes a comma separated list
        value: String,
    },
    /// Restore all settings to their defaults
    Reset,
}
