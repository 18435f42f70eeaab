//! Command dispatch and handlers.

pub mod once;
pub mod watch;

use std::env;
use std::path::Path;

use log::info;
use tokio::runtime::Runtime;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::engine::resolve_schema;
use crate::error::AppError;

/// Environment variable naming the directory recordings are written to.
pub const RECORD_ENV: &str = "BOARD_PILOT_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `BOARD_PILOT_RECORD` is set to a directory path, board and agent
/// interactions are recorded to cassette files under that directory.
/// In `once` mode, a failure before the command starts still writes the
/// "no tasks" outputs.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the runtime cannot
/// start, recording cannot begin, or the selected command fails.
pub fn dispatch(cli: &Cli) -> Result<(), AppError> {
    let prepared = match Prepared::new(cli) {
        Ok(prepared) => prepared,
        Err(err) => {
            if let Command::Once(args) = &cli.command {
                once::report_failure(&LiveFileSystem, args.output.as_deref());
            }
            return Err(err);
        }
    };
    let Prepared { config, runtime, ctx, session } = prepared;

    let result = runtime.block_on(dispatch_with_context(&cli.command, &config, &ctx));

    // Finish recording after the command completes, even on error.
    if let Some(session) = session {
        // Drop the context first to release the recorders.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Everything a command needs before it can run.
struct Prepared {
    config: Config,
    runtime: Runtime,
    ctx: ServiceContext,
    session: Option<RecordingSession>,
}

impl Prepared {
    fn new(cli: &Cli) -> Result<Self, AppError> {
        let config = Config::from_cli(cli)?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        let (ctx, session) = if let Some(root) = env::var_os(RECORD_ENV) {
            let (ctx, session) = ServiceContext::recording_at(&config, Path::new(&root))
                .map_err(AppError::Recording)?;
            (ctx, Some(session))
        } else {
            (ServiceContext::live(&config), None)
        };

        Ok(Self { config, runtime, ctx, session })
    }
}

/// Resolves the status schema, then runs `command` against `ctx`.
///
/// # Errors
///
/// Returns an error if the command fails.
pub async fn dispatch_with_context(
    command: &Command,
    config: &Config,
    ctx: &ServiceContext,
) -> Result<(), AppError> {
    let schema = resolve_schema(ctx.board.as_ref(), &config.stages).await;
    match command {
        Command::Watch(args) => watch::run(ctx, config, &schema, args).await,
        Command::Once(args) => once::run(ctx, config, &schema, args).await,
    }
}

fn finish_recording(session: RecordingSession) -> Result<(), AppError> {
    let output_dir = session.finish().map_err(AppError::Recording)?;
    info!("event=recording_saved dir={}", output_dir.display());
    Ok(())
}
