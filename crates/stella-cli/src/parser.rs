//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the stella terminal companion.
///
/// Running without a subcommand starts a chat session.
#[derive(Parser)]
#[command(name = "stella")]
#[command(about = "A caring AI companion that lives in your terminal")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (memory, journal, settings) for this invocation
    #[arg(long = "data-dir", global = true, env = "STELLA_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The requested command, defaulting to a full-profile chat.
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or_default()
    }
}
