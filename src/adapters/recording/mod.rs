//! Recording adapters that capture interactions to cassettes.

pub mod agent;
pub mod board;

pub use agent::RecordingTaskAgent;
pub use board::RecordingBoardClient;

use std::sync::{Arc, Mutex, PoisonError};

use log::warn;
use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Mirror of `replaying::replay_result`.
///
/// Convention:
/// - `Ok(v)` is serialized as `{"Ok": v}`
/// - `Err(e)` is serialized as `{"Err": e.to_string()}`
///
/// A value that fails to serialize is logged and left out of the cassette;
/// the live call still returns normally.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let encoded = serde_json::to_value(input).and_then(|input_json| {
        let output_json = match result {
            Ok(v) => serde_json::json!({ "Ok": serde_json::to_value(v)? }),
            Err(e) => serde_json::json!({ "Err": e.to_string() }),
        };
        Ok((input_json, output_json))
    });

    match encoded {
        Ok((input_json, output_json)) => {
            let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            guard.record(port, method, input_json, output_json);
        }
        Err(err) => warn!("event=record status=skipped port={port} method={method} error={err}"),
    }
}
