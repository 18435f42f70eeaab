//! Long-running poller backed by an in-memory known set.

use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use uuid::Uuid;

use super::eligibility;
use super::known::{KnownItems, Observation};
use super::orchestrator::Orchestrator;
use super::report::CycleReport;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::BoardError;
use crate::model::{BoardSnapshot, FieldSchema};

/// Polls the board and executes newly discovered pending items.
pub struct Watcher<'a> {
    ctx: &'a ServiceContext,
    config: &'a Config,
    schema: &'a FieldSchema,
    known: KnownItems,
}

impl<'a> Watcher<'a> {
    /// Creates a watcher. The first poll takes the baseline.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a Config, schema: &'a FieldSchema) -> Self {
        Self { ctx, config, schema, known: KnownItems::new() }
    }

    /// Ids seen so far.
    #[must_use]
    pub fn known(&self) -> &KnownItems {
        &self.known
    }

    /// Runs one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if the board cannot be listed. The known set
    /// is left untouched in that case.
    pub async fn poll_once(&mut self) -> Result<CycleReport, BoardError> {
        let mut report = CycleReport::new(Uuid::new_v4().to_string());
        let snapshot = self.ctx.board.list_items().await?;
        warn_if_truncated(&snapshot);
        report.board_title.clone_from(&snapshot.title);

        let new_ids = match self.known.observe(snapshot.items.iter().map(|item| &item.id)) {
            Observation::Baseline { recorded } => {
                info!("event=baseline cycle={} recorded={recorded}", report.cycle_id);
                report.baseline = Some(recorded);
                return Ok(report);
            }
            Observation::New(ids) => ids,
        };
        report.discovered = new_ids.len();

        let selection =
            eligibility::select(new_ids.iter().filter_map(|id| snapshot.item(id)), self.schema);
        report.record_selection(&selection);

        let orchestrator = Orchestrator::new(self.ctx, self.config, self.schema);
        for task in &selection.tasks {
            let Some(item) = snapshot.item(&task.item_id) else { continue };
            let execution = orchestrator.execute(item, task).await;
            report.record_execution(&execution);
        }
        Ok(report)
    }

    /// Polls every `interval` until `shutdown` flips to `true`.
    ///
    /// A failing cycle is logged and the loop carries on. Shutdown is only
    /// observed between cycles.
    pub async fn run(&mut self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(
            "event=watch_started board={} interval_secs={}",
            self.config.board,
            interval.as_secs()
        );
        loop {
            if *shutdown.borrow() {
                break;
            }
            match self.poll_once().await {
                Ok(report) => report.log("watch"),
                Err(err) => warn!("event=cycle_failed mode=watch error={err}"),
            }
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("event=watch_stopped known={}", self.known.len());
    }
}

/// Warns when the board holds more items than one read returns.
pub(crate) fn warn_if_truncated(snapshot: &BoardSnapshot) {
    if snapshot.is_truncated() {
        warn!(
            "event=item_cap_reached visible={} total={}",
            snapshot.items.len(),
            snapshot.total_count
        );
    }
}

/// Flips the shutdown flag once ctrl-c is received.
///
/// If the handler cannot be installed the flag is never flipped and the
/// watcher runs until the process is killed.
pub async fn forward_ctrl_c(sender: watch::Sender<bool>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("event=shutdown_requested signal=ctrl_c");
            let _ = sender.send(true);
        }
        Err(err) => {
            warn!("event=signal_listen status=failed error={err}");
            std::future::pending::<()>().await;
        }
    }
}
