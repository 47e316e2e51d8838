//! System probe port for hardware and presence detection.
//!
//! This port abstracts active system probing (command execution, hardware
//! detection) from the core domain. Implementations live in adapters
//! (`stella-runtime`).
//!
//! # Design Notes
//!
//! - Core owns the trait and types (pure)
//! - Runtime owns the implementation (active probing via `tokio::process`)
//! - Every probe step reports a [`ProbeError`] so callers can tell an absent
//!   tool apart from one that crashed, even though both downgrade to "absent"

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{GpuType, HardwareFacts};

/// Errors that can occur during system probing.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The diagnostic binary is not installed.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// The diagnostic binary did not finish in time.
    #[error("Command {command} timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    /// The diagnostic binary exited unsuccessfully.
    #[error("Command {command} exited with status {code:?}")]
    NonZeroExit { command: String, code: Option<i32> },

    /// The command ran but its output lacked what we were looking for.
    #[error("Unexpected output from {command}: {reason}")]
    Parse { command: String, reason: String },

    /// Spawning or waiting on the process failed for another reason.
    #[error("Command execution failed: {0}")]
    Io(String),
}

impl ProbeError {
    /// True when the tool is simply not there (missing or not answering).
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::TimedOut { .. })
    }
}

/// Result type for system probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Captured output of a finished diagnostic command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Turn a non-zero exit into [`ProbeError::NonZeroExit`].
    pub fn require_success(self, command: &str) -> ProbeResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProbeError::NonZeroExit {
                command: command.to_string(),
                code: self.code,
            })
        }
    }
}

/// Runs an external diagnostic command with a bounded wait.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture its output.
    ///
    /// Implementations must enforce their timeout and must not treat a
    /// non-zero exit as an error; that decision belongs to the caller.
    async fn run(&self, program: &str, args: &[&str]) -> ProbeResult<CommandOutput>;
}

/// Port for probing hardware and user presence.
///
/// None of these methods fail: probe errors are downgraded to "absent"
/// inside the implementation.
#[async_trait]
pub trait SystemProbePort: Send + Sync {
    /// Gather raw hardware facts (CPU count, GPU, runtime version).
    async fn detect_hardware(&self) -> HardwareFacts;

    /// Seconds since the last user input, 0 when unknown.
    async fn idle_seconds(&self) -> u64;

    /// Known problems with the GPU stack, empty when none are found.
    async fn compatibility_issues(&self, gpu_type: GpuType) -> Vec<String>;

    /// Human-readable GPU utilisation lines.
    async fn gpu_usage(&self, gpu_type: GpuType) -> Vec<String>;
}
