//! Live adapter for the `TaskAgent` port using a subprocess.

use std::process::Stdio;

use tokio::process::Command;

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::ports::agent::{AgentFuture, AgentOutput, TaskAgent};

/// Runs the agent as `<program> <args...> <prompt>`.
///
/// The child is killed when the run future is dropped, which is how the
/// caller's deadline takes effect.
pub struct CommandAgent {
    program: String,
    args: Vec<String>,
}

impl CommandAgent {
    /// Creates an agent from the configured program and arguments.
    #[must_use]
    pub fn new(settings: &AgentSettings) -> Self {
        Self { program: settings.program.clone(), args: settings.args.clone() }
    }
}

impl TaskAgent for CommandAgent {
    fn run(&self, prompt: &str) -> AgentFuture<'_> {
        let prompt = prompt.to_string();
        Box::pin(async move {
            let output = Command::new(&self.program)
                .args(&self.args)
                .arg(&prompt)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| AgentError::Spawn { program: self.program.clone(), source })?;

            Ok(AgentOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
