//! Discovery, deduplication, and state-transition engine.
//!
//! Leaf-first: the resolver maps stage names to option ids once, the
//! known set and the ledger decide what is new, eligibility narrows it,
//! the orchestrator runs tasks and records outcomes, and the watch and
//! batch drivers tie a cycle together.

pub mod batch;
pub mod eligibility;
pub mod known;
pub mod ledger;
pub mod notify;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod watch;

pub use batch::{run_once, HandOff, OnceOptions, PipelineOutputs};
pub use eligibility::{classify, select, Eligibility, Selection};
pub use known::{KnownItems, Observation};
pub use ledger::{ProcessedLedger, RETENTION_DAYS};
pub use orchestrator::{ExecutionReport, Orchestrator, TransitionOutcome, Verdict};
pub use report::CycleReport;
pub use resolver::{resolve_schema, schema_from_fields};
pub use watch::{forward_ctrl_c, Watcher};
