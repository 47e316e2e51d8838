//! A `CommandRunner` that answers from a fixed script.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use stella_core::ports::{CommandOutput, CommandRunner, ProbeError, ProbeResult};

/// Commands not in the script behave as if the binary were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `command` (program plus args, space separated) to succeed.
    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Script `command` to exit with `code`.
    pub fn fail(mut self, command: &str, code: i32) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                code: Some(code),
                ..CommandOutput::default()
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> ProbeResult<CommandOutput> {
        let key = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| ProbeError::NotFound(program.to_string()))
    }
}
