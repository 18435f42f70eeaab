//! Recording adapter for the `TaskAgent` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{AgentFuture, TaskAgent};

/// Records agent runs while delegating to an inner implementation.
pub struct RecordingTaskAgent {
    inner: Box<dyn TaskAgent>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskAgent {
    /// Creates a new recording agent wrapping the given implementation.
    pub fn new(inner: Box<dyn TaskAgent>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PromptInput {
    prompt: String,
}

impl TaskAgent for RecordingTaskAgent {
    fn run(&self, prompt: &str) -> AgentFuture<'_> {
        let input = PromptInput { prompt: prompt.to_string() };
        Box::pin(async move {
            let result = self.inner.run(&input.prompt).await;
            record_result(&self.recorder, "agent", "run", &input, &result);
            result
        })
    }
}
