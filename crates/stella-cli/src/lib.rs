//! Stella terminal companion CLI.
//!
//! `main.rs` is the entry point; everything it dispatches to lives here so
//! the parser, handlers and presentation can be unit tested.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, ProfileArg};
pub use config_commands::ConfigCommand;
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
