//! `watch`: poll until interrupted.

use std::time::Duration;

use tokio::sync::watch;

use crate::cli::WatchArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::engine::{forward_ctrl_c, Watcher};
use crate::error::AppError;
use crate::model::FieldSchema;

/// Runs the watcher until ctrl-c.
///
/// # Errors
///
/// Never fails once started; cycle errors are logged inside the loop.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    schema: &FieldSchema,
    args: &WatchArgs,
) -> Result<(), AppError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal = tokio::spawn(forward_ctrl_c(shutdown_tx));

    let mut watcher = Watcher::new(ctx, config, schema);
    watcher.run(Duration::from_secs(args.interval), shutdown_rx).await;

    signal.abort();
    Ok(())
}
