//! One-shot run backed by the durable ledger.
//!
//! A run reads the ledger, selects items it has never inspected, records
//! every one of them, saves the ledger, then writes the task summary and
//! pipeline outputs before any task is executed or handed off.

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use uuid::Uuid;

use super::eligibility;
use super::ledger::ProcessedLedger;
use super::notify::{self, EventKind, ItemEvent};
use super::orchestrator::{Orchestrator, TransitionOutcome};
use super::report::CycleReport;
use super::watch::warn_if_truncated;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::model::{FieldSchema, Task};
use crate::ports::FileSystem;

/// What happens to selected tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandOff {
    /// Run each task through the agent in this process.
    #[default]
    Execute,
    /// Announce the tasks and move them to in-review for a later pipeline
    /// step to execute.
    Defer,
}

/// Paths and mode of a one-shot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnceOptions {
    /// Ledger file.
    pub ledger_path: PathBuf,
    /// Task summary artifact.
    pub summary_path: PathBuf,
    /// Pipeline output file, if the pipeline provided one.
    pub output_path: Option<PathBuf>,
    /// Execute or defer.
    pub hand_off: HandOff,
}

/// The two values a one-shot run reports to its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutputs {
    /// Whether any task was selected.
    pub has_tasks: bool,
    /// How many tasks were selected.
    pub task_count: usize,
}

impl PipelineOutputs {
    /// Outputs for `count` selected tasks.
    #[must_use]
    pub fn for_count(count: usize) -> Self {
        Self { has_tasks: count > 0, task_count: count }
    }

    /// The values reported on the failure path.
    #[must_use]
    pub fn none() -> Self {
        Self::for_count(0)
    }

    /// `key=value` lines in pipeline output syntax.
    #[must_use]
    pub fn render(&self) -> String {
        format!("has_tasks={}\ntask_count={}\n", self.has_tasks, self.task_count)
    }

    /// Appends the outputs to `path`, or logs them when no path is set.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Artifact`] if the file cannot be written.
    pub fn emit(&self, fs: &dyn FileSystem, path: Option<&Path>) -> Result<(), AppError> {
        let Some(path) = path else {
            info!("event=outputs has_tasks={} task_count={}", self.has_tasks, self.task_count);
            return Ok(());
        };
        fs.append(path, &self.render())
            .map_err(|e| AppError::Artifact { path: path.to_path_buf(), message: e.to_string() })
    }
}

/// Renders the task summary artifact.
#[must_use]
pub fn render_summary(tasks: &[Task]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            format!(
                "## Task {}: {}\n{}",
                index + 1,
                task.title.as_deref().unwrap_or("Untitled"),
                task.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs one one-shot cycle.
///
/// # Errors
///
/// Returns [`AppError::Artifact`] if the summary or outputs cannot be
/// written. A board read failure is logged and ends the cycle with "no
/// tasks" outputs and an untouched ledger. Ledger persistence failures are
/// logged, not returned.
pub async fn run_once(
    ctx: &ServiceContext,
    config: &Config,
    schema: &FieldSchema,
    options: &OnceOptions,
) -> Result<(CycleReport, PipelineOutputs), AppError> {
    let mut report = CycleReport::new(Uuid::new_v4().to_string());
    let mut ledger = ProcessedLedger::load(ctx.fs.as_ref(), &options.ledger_path);

    let snapshot = match ctx.board.list_items().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!("event=board_read status=failed mode=once error={err}");
            let outputs = PipelineOutputs::none();
            outputs.emit(ctx.fs.as_ref(), options.output_path.as_deref())?;
            return Ok((report, outputs));
        }
    };
    warn_if_truncated(&snapshot);
    report.board_title.clone_from(&snapshot.title);

    let now = ctx.clock.now();
    let unseen: Vec<_> =
        snapshot.items.iter().filter(|item| !ledger.contains(&item.id)).collect();
    for item in &unseen {
        ledger.record(item.id.clone(), now);
    }
    report.discovered = unseen.len();

    let selection = eligibility::select(unseen.iter().copied(), schema);
    report.record_selection(&selection);

    if let Err(err) = ledger.save(ctx.fs.as_ref(), &options.ledger_path, now) {
        warn!("event=ledger_save status=failed error={err}");
    }

    let orchestrator = Orchestrator::new(ctx, config, schema);
    if options.hand_off == HandOff::Defer {
        for task in &selection.tasks {
            if let Some(item) = snapshot.item(&task.item_id) {
                let event = ItemEvent::new(EventKind::Discovered, item, task, schema);
                let notification = notify::build_notification(&event, &config.board, now);
                notify::dispatch(ctx.notifier.as_ref(), &notification).await;
            }
        }
    }

    let outputs = PipelineOutputs::for_count(selection.tasks.len());
    if !selection.tasks.is_empty() {
        ctx.fs
            .write(&options.summary_path, &render_summary(&selection.tasks))
            .map_err(|e| AppError::Artifact {
                path: options.summary_path.clone(),
                message: e.to_string(),
            })?;
        info!(
            "event=summary_written path={} tasks={}",
            options.summary_path.display(),
            selection.tasks.len()
        );
    }
    outputs.emit(ctx.fs.as_ref(), options.output_path.as_deref())?;

    for task in &selection.tasks {
        let Some(item) = snapshot.item(&task.item_id) else { continue };
        match options.hand_off {
            HandOff::Execute => {
                let execution = orchestrator.execute(item, task).await;
                report.record_execution(&execution);
            }
            HandOff::Defer => {
                let transition = orchestrator.move_to_review(&task.item_id).await;
                report.record_transition(&transition);
                if transition == TransitionOutcome::Applied {
                    let mut event = ItemEvent::new(EventKind::Queued, item, task, schema);
                    event.board_update = Some(transition.to_string());
                    let notification =
                        notify::build_notification(&event, &config.board, ctx.clock.now());
                    notify::dispatch(ctx.notifier.as_ref(), &notification).await;
                }
            }
        }
    }

    Ok((report, outputs))
}
