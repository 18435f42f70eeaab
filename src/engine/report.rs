//! Per-cycle counters.

use log::info;

use super::eligibility::Selection;
use super::orchestrator::{ExecutionReport, TransitionOutcome};

/// What one poll cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Correlates the cycle's log lines.
    pub cycle_id: String,
    /// Board title, when the board reported one.
    pub board_title: Option<String>,
    /// Ids recorded by a baseline cycle. `None` for ordinary cycles.
    pub baseline: Option<usize>,
    /// Items not seen before.
    pub discovered: usize,
    /// Tasks selected for execution or hand-off.
    pub eligible: usize,
    /// Eligible items with no usable text.
    pub skipped_empty: usize,
    /// New items outside the pending stage.
    pub ineligible: usize,
    /// Agent runs that exited 0.
    pub succeeded: usize,
    /// Agent runs that failed or timed out.
    pub failed: usize,
    /// Items moved to in-review.
    pub transitions_applied: usize,
    /// Status updates that were attempted and failed.
    pub transitions_failed: usize,
}

impl CycleReport {
    /// An empty report for a new cycle.
    #[must_use]
    pub fn new(cycle_id: impl Into<String>) -> Self {
        Self { cycle_id: cycle_id.into(), ..Self::default() }
    }

    /// Folds in the selection counts.
    pub fn record_selection(&mut self, selection: &Selection) {
        self.eligible = selection.tasks.len();
        self.skipped_empty = selection.skipped_empty;
        self.ineligible = selection.ineligible;
    }

    /// Folds in one execution.
    pub fn record_execution(&mut self, execution: &ExecutionReport) {
        if execution.verdict.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.record_transition(&execution.transition);
    }

    /// Folds in one board update.
    pub fn record_transition(&mut self, transition: &TransitionOutcome) {
        match transition {
            TransitionOutcome::Applied => self.transitions_applied += 1,
            TransitionOutcome::Failed(_) => self.transitions_failed += 1,
            TransitionOutcome::NotAttempted => {}
        }
    }

    /// Logs the summary line.
    pub fn log(&self, mode: &str) {
        let title = self.board_title.as_deref().unwrap_or("-");
        if let Some(recorded) = self.baseline {
            info!(
                "event=cycle_done mode={mode} cycle={} board={title:?} baseline={recorded}",
                self.cycle_id
            );
            return;
        }
        info!(
            "event=cycle_done mode={mode} cycle={} board={title:?} discovered={} eligible={} \
             skipped_empty={} ineligible={} succeeded={} failed={} transitions_applied={} \
             transitions_failed={}",
            self.cycle_id,
            self.discovered,
            self.eligible,
            self.skipped_empty,
            self.ineligible,
            self.succeeded,
            self.failed,
            self.transitions_applied,
            self.transitions_failed,
        );
    }
}
