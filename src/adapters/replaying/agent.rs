//! Replaying adapter for the `TaskAgent` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::AgentError;
use crate::ports::{AgentFuture, TaskAgent};

/// Serves recorded agent runs from a cassette.
pub struct ReplayingTaskAgent {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskAgent {
    /// Creates a new replaying agent from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl TaskAgent for ReplayingTaskAgent {
    fn run(&self, _prompt: &str) -> AgentFuture<'_> {
        let output = next_output(&self.replayer, "agent", "run");
        Box::pin(async move { replay_result(output, AgentError::Replayed) })
    }
}
