//! `once`: process unseen items a single time.

use std::path::Path;

use log::{error, info};

use crate::cli::OnceArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::engine::{run_once, HandOff, OnceOptions, PipelineOutputs};
use crate::error::AppError;
use crate::model::FieldSchema;
use crate::ports::FileSystem;

/// Converts arguments into run options.
#[must_use]
pub fn options(args: &OnceArgs) -> OnceOptions {
    OnceOptions {
        ledger_path: args.ledger.clone(),
        summary_path: args.summary.clone(),
        output_path: args.output.clone(),
        hand_off: if args.defer { HandOff::Defer } else { HandOff::Execute },
    }
}

/// Runs one cycle. On failure the outputs are forced to "no tasks" before
/// the error is returned.
///
/// # Errors
///
/// Returns the cycle's error.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    schema: &FieldSchema,
    args: &OnceArgs,
) -> Result<(), AppError> {
    match run_once(ctx, config, schema, &options(args)).await {
        Ok((report, outputs)) => {
            report.log("once");
            info!(
                "event=once_done has_tasks={} task_count={}",
                outputs.has_tasks, outputs.task_count
            );
            Ok(())
        }
        Err(err) => {
            error!("event=cycle_failed mode=once error={err}");
            report_failure(ctx.fs.as_ref(), args.output.as_deref());
            Err(err)
        }
    }
}

/// Emits the "no tasks" outputs. A write failure is only logged.
pub fn report_failure(fs: &dyn FileSystem, output: Option<&Path>) {
    if let Err(err) = PipelineOutputs::none().emit(fs, output) {
        error!("event=outputs status=failed error={err}");
    }
}
