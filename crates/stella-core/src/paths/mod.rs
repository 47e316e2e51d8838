//! Path utilities for stella data directories.
//!
//! This module provides the canonical path resolution for:
//! - The data root (memory, journal, settings, `.env`)
//! - The model runtime's configuration file
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O

mod ensure;
mod error;
mod files;
mod platform;
mod resolver;

#[cfg(test)]
mod test_utils;

pub use error::PathError;

pub use platform::{
    DATA_DIR_ENV, RUNTIME_CONFIG_ENV, data_root, normalize_user_path, runtime_config_path,
};

pub use files::{
    ENV_FILE, JOURNAL_FILE, MEMORY_FILE, SETTINGS_FILE, env_file_path, journal_path_in,
    memory_path_in, settings_path_in,
};

pub use ensure::{ensure_directory, verify_writable};

pub use resolver::ResolvedPaths;
