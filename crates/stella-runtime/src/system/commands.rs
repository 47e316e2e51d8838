//! Bounded execution of diagnostic commands.
//!
//! Every diagnostic tool runs through [`ProcessCommandRunner`], which caps
//! the wait with `tokio::time::timeout` and kills the child when the wait
//! is abandoned.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use stella_core::ports::{CommandOutput, CommandRunner, ProbeError, ProbeResult};

/// Default wait for a diagnostic command.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs commands with `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessCommandRunner {
    timeout: Duration,
}

impl ProcessCommandRunner {
    pub const fn new() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ProcessCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> ProbeResult<CommandOutput> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProbeError::NotFound(program.to_string()),
                _ => ProbeError::Io(format!("{program}: {e}")),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::TimedOut {
                command: program.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| ProbeError::Io(format!("{program}: {e}")))?;

        debug!(program, code = ?output.status.code(), "Diagnostic command finished");

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// First non-empty line of stdout, falling back to stderr.
///
/// Some tools print their version on stderr.
pub fn first_output_line(output: &CommandOutput) -> Option<String> {
    let text = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
}
