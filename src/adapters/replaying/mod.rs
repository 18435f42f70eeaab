//! Replaying adapters that serve recorded interactions.

pub mod agent;
pub mod board;

pub use agent::ReplayingTaskAgent;
pub use board::ReplayingBoardClient;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;

/// Takes the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the cassette has no more interactions for the pair.
pub(crate) fn next_output(replayer: &Mutex<CassetteReplayer>, port: &str, method: &str) -> Value {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).output.clone()
}

/// Decodes a recorded `{"Ok": v}` / `{"Err": "message"}` output.
///
/// Mirror of `recording::record_result`. `wrap` turns the recorded error
/// message back into the port's error type.
///
/// # Panics
///
/// Panics if the output matches neither shape, which means the cassette
/// is corrupt.
pub(crate) fn replay_result<T, E>(output: Value, wrap: impl FnOnce(String) -> E) -> Result<T, E>
where
    T: DeserializeOwned,
{
    if let Some(err) = output.get("Err") {
        let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(wrap(message));
    }
    match output.get("Ok").cloned().map(serde_json::from_value) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => panic!("Cassette output does not decode: {e}"),
        None => panic!("Cassette output is neither Ok nor Err: {output}"),
    }
}
