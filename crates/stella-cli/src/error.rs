//! CLI-specific error types and mappings to exit codes.

use stella_core::ports::{ChatError, RepositoryError};
use stella_core::{PathError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or setting value rejected.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration or path resolution error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model runtime could not be reached or answered badly.
    #[error("Model runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    /// Map error to an exit code following sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Runtime(_) => 69,  // EX_UNAVAILABLE
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Invalid(e) => Self::Arguments(e.to_string()),
            RepositoryError::Storage(msg) => Self::Io(msg),
            RepositoryError::Serialization(msg) => Self::Config(msg),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ChatError> for CliError {
    fn from(err: ChatError) -> Self {
        Self::Runtime(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error bubbled up to `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(CliError::Runtime(String::new()).exit_code(), 69);
    }

    #[test]
    fn test_settings_error_is_usage() {
        let err: CliError = SettingsError::UnknownKey("colour".into()).into();
        assert_eq!(err.exit_code(), 2);

        let err: CliError = RepositoryError::Invalid(SettingsError::InvalidTopP(2.0)).into();
        assert!(matches!(err, CliError::Arguments(_)));
    }

    #[test]
    fn test_exit_code_for_anyhow() {
        let err = anyhow::Error::new(CliError::Runtime("down".into()));
        assert_eq!(exit_code_for(&err), 69);
        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }
}
