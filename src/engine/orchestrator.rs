//! Runs one task through the agent and records the outcome.
//!
//! Every execution sends exactly one notification. A successful run is
//! followed by exactly one attempt to move the item to in-review; a
//! failed run never touches the board.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::notify::{self, EventKind, ItemEvent};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::model::{FieldSchema, Item, ItemId, Stage, Task};
use crate::ports::AgentOutput;

/// Appended to the prompt when the agent should publish its work.
pub const PUBLISH_INSTRUCTION: &str =
    "When you are done, commit your changes with a descriptive message and push them to the remote repository.";

/// Builds the prompt handed to the agent.
#[must_use]
pub fn build_prompt(task: &Task, publish: bool) -> String {
    if publish {
        format!("{}\n\n{PUBLISH_INSTRUCTION}", task.text)
    } else {
        task.text.clone()
    }
}

/// Why an execution failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The agent exited with a non-zero code, or was killed by a signal.
    ExitCode(Option<i32>),
    /// The agent ran past the deadline and was abandoned.
    TimedOut(Duration),
    /// The agent could not be started.
    Launch(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitCode(Some(code)) => write!(f, "agent exited with code {code}"),
            Self::ExitCode(None) => f.write_str("agent was terminated by a signal"),
            Self::TimedOut(limit) => write!(f, "agent timed out after {}s", limit.as_secs()),
            Self::Launch(message) => write!(f, "agent failed to start: {message}"),
        }
    }
}

/// Result of the agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Exit code 0.
    Succeeded,
    /// Anything else.
    Failed(FailureReason),
}

impl Verdict {
    /// Returns `true` on success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Result of the follow-up board update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The item moved to in-review.
    Applied,
    /// The update was attempted and failed.
    Failed(String),
    /// No update was attempted.
    NotAttempted,
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("moved to in-review"),
            Self::Failed(message) => write!(f, "status update failed: {message}"),
            Self::NotAttempted => f.write_str("not attempted"),
        }
    }
}

/// Everything that happened to one task.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Item the task came from.
    pub item_id: ItemId,
    /// Agent verdict.
    pub verdict: Verdict,
    /// Board update after the run.
    pub transition: TransitionOutcome,
    /// Wall-clock run time of the agent.
    pub duration: Duration,
    /// Captured agent output, when the agent ran to completion.
    pub output: Option<AgentOutput>,
}

/// Executes tasks against one context, config, and schema.
pub struct Orchestrator<'a> {
    ctx: &'a ServiceContext,
    config: &'a Config,
    schema: &'a FieldSchema,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a Config, schema: &'a FieldSchema) -> Self {
        Self { ctx, config, schema }
    }

    /// Runs `task` once, moves the item on success, and notifies.
    pub async fn execute(&self, item: &Item, task: &Task) -> ExecutionReport {
        let prompt = build_prompt(task, self.config.agent.publish_changes);
        let limit = self.config.agent.timeout;
        info!("event=task_started item={} timeout_secs={}", task.item_id, limit.as_secs());

        let started = Instant::now();
        let (verdict, output) =
            match tokio::time::timeout(limit, self.ctx.agent.run(&prompt)).await {
                Err(_) => (Verdict::Failed(FailureReason::TimedOut(limit)), None),
                Ok(Err(err)) => (Verdict::Failed(FailureReason::Launch(err.to_string())), None),
                Ok(Ok(output)) if output.succeeded() => (Verdict::Succeeded, Some(output)),
                Ok(Ok(output)) => {
                    (Verdict::Failed(FailureReason::ExitCode(output.exit_code)), Some(output))
                }
            };
        let duration = started.elapsed();

        if let Some(output) = &output {
            debug!(
                "event=agent_output item={} stdout_bytes={} stderr_bytes={}",
                task.item_id,
                output.stdout.len(),
                output.stderr.len()
            );
        }

        let transition = match &verdict {
            Verdict::Succeeded => {
                info!(
                    "event=task_finished item={} status=succeeded duration_ms={}",
                    task.item_id,
                    duration.as_millis()
                );
                self.move_to_review(&task.item_id).await
            }
            Verdict::Failed(reason) => {
                warn!(
                    "event=task_finished item={} status=failed duration_ms={} reason={reason}",
                    task.item_id,
                    duration.as_millis()
                );
                TransitionOutcome::NotAttempted
            }
        };

        let mut event = ItemEvent::new(
            if verdict.is_success() { EventKind::Succeeded } else { EventKind::Failed },
            item,
            task,
            self.schema,
        );
        event.duration = Some(duration);
        match &verdict {
            Verdict::Succeeded => event.board_update = Some(transition.to_string()),
            Verdict::Failed(reason) => event.reason = Some(reason.to_string()),
        }
        let notification =
            notify::build_notification(&event, &self.config.board, self.ctx.clock.now());
        notify::dispatch(self.ctx.notifier.as_ref(), &notification).await;

        ExecutionReport { item_id: task.item_id.clone(), verdict, transition, duration, output }
    }

    /// Makes one attempt to move an item to in-review.
    pub async fn move_to_review(&self, item_id: &ItemId) -> TransitionOutcome {
        let update = match self.schema.update_for(item_id, Stage::InReview) {
            Ok(update) => update,
            Err(err) => {
                warn!("event=transition item={item_id} status=failed error={err}");
                return TransitionOutcome::Failed(err.to_string());
            }
        };
        match self.ctx.board.set_status(&update).await {
            Ok(()) => {
                info!("event=transition item={item_id} status=applied stage=in-review");
                TransitionOutcome::Applied
            }
            Err(err) => {
                warn!("event=transition item={item_id} status=failed error={err}");
                TransitionOutcome::Failed(err.to_string())
            }
        }
    }
}
