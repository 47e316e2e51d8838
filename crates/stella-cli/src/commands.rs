//! Top-level subcommands.

use clap::{Subcommand, ValueEnum};

use stella_core::PerformanceProfile;

use crate::config_commands::ConfigCommand;

/// Resource profile selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Detect hardware and use all of it
    #[default]
    Full,
    /// Minimal fixed resources, no hardware probing
    Low,
}

impl From<ProfileArg> for PerformanceProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Full => Self::Full,
            ProfileArg::Low => Self::Low,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat {
        /// Resource profile
        #[arg(long, value_enum, default_value_t = ProfileArg::Full)]
        profile: ProfileArg,
        /// Candidate model to try, in order (repeatable; replaces the configured list)
        #[arg(long)]
        model: Vec<String>,
    },
    /// Show detected hardware, runtime versions and GPU diagnostics
    Info {
        /// Resource profile
        #[arg(long, value_enum, default_value_t = ProfileArg::Full)]
        profile: ProfileArg,
    },
    /// List installed models that answer quickly on CPU
    Models,
    /// Show all resolved paths
    Paths,
    /// Manage persisted settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Chat {
            profile: ProfileArg::Full,
            model: Vec::new(),
        }
    }
}
