//! Replaying adapter for the `BoardClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::BoardError;
use crate::model::{BoardSnapshot, ProjectFields, StatusUpdate};
use crate::ports::{BoardClient, BoardFuture};

/// Serves recorded board responses from a cassette.
pub struct ReplayingBoardClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingBoardClient {
    /// Creates a new replaying board client from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl BoardClient for ReplayingBoardClient {
    fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields> {
        let output = next_output(&self.replayer, "board", "fetch_fields");
        Box::pin(async move { replay_result(output, BoardError::Replayed) })
    }

    fn list_items(&self) -> BoardFuture<'_, BoardSnapshot> {
        let output = next_output(&self.replayer, "board", "list_items");
        Box::pin(async move { replay_result(output, BoardError::Replayed) })
    }

    fn set_status(&self, _update: &StatusUpdate) -> BoardFuture<'_, ()> {
        let output = next_output(&self.replayer, "board", "set_status");
        Box::pin(async move { replay_result(output, BoardError::Replayed) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            board: "acme/widgets#3".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[tokio::test]
    async fn replays_snapshot_and_error() {
        let board = ReplayingBoardClient::new(make_replayer(vec![
            Interaction {
                seq: 0,
                port: "board".into(),
                method: "list_items".into(),
                input: json!(null),
                output: json!({"Ok": {"title": "Roadmap", "items": [], "total_count": 0}}),
            },
            Interaction {
                seq: 1,
                port: "board".into(),
                method: "fetch_fields".into(),
                input: json!(null),
                output: json!({"Err": "board request failed: connection refused"}),
            },
        ]));

        let snapshot = board.list_items().await.unwrap();
        assert_eq!(snapshot.title.as_deref(), Some("Roadmap"));

        let err = board.fetch_fields().await.unwrap_err();
        assert!(matches!(err, BoardError::Replayed(ref m) if m.contains("connection refused")));
    }
}
