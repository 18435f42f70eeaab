//! Task agent port for running a prompt to completion.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Boxed future type alias used by [`TaskAgent`].
pub type AgentFuture<'a> = Pin<Box<dyn Future<Output = Result<AgentOutput, AgentError>> + Send + 'a>>;

/// What a finished agent run reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Process exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output, for diagnostics only.
    pub stdout: String,
    /// Captured standard error, for diagnostics only.
    pub stderr: String,
}

impl AgentOutput {
    /// Exit code 0 is the only success signal.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a prompt through an external agent and waits for it to exit.
///
/// Implementations must stop the agent when the returned future is dropped,
/// so callers can enforce a deadline by abandoning the future.
pub trait TaskAgent: Send + Sync {
    /// Runs the agent on `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent cannot be launched.
    fn run(&self, prompt: &str) -> AgentFuture<'_>;
}
