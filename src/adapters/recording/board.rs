//! Recording adapter for the `BoardClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::{BoardSnapshot, ProjectFields, StatusUpdate};
use crate::ports::{BoardClient, BoardFuture};

/// Records board interactions while delegating to an inner implementation.
pub struct RecordingBoardClient {
    inner: Box<dyn BoardClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBoardClient {
    /// Creates a new recording board client wrapping the given implementation.
    pub fn new(inner: Box<dyn BoardClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl BoardClient for RecordingBoardClient {
    fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields> {
        Box::pin(async move {
            let result = self.inner.fetch_fields().await;
            record_result(&self.recorder, "board", "fetch_fields", &(), &result);
            result
        })
    }

    fn list_items(&self) -> BoardFuture<'_, BoardSnapshot> {
        Box::pin(async move {
            let result = self.inner.list_items().await;
            record_result(&self.recorder, "board", "list_items", &(), &result);
            result
        })
    }

    fn set_status(&self, update: &StatusUpdate) -> BoardFuture<'_, ()> {
        let update = update.clone();
        Box::pin(async move {
            let result = self.inner.set_status(&update).await;
            record_result(&self.recorder, "board", "set_status", &update, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::model::{ItemId, OptionId};

    struct StubBoard;

    impl BoardClient for StubBoard {
        fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields> {
            Box::pin(async { Err(BoardError::MissingData) })
        }

        fn list_items(&self) -> BoardFuture<'_, BoardSnapshot> {
            Box::pin(async {
                Ok(BoardSnapshot { title: Some("Roadmap".into()), ..BoardSnapshot::default() })
            })
        }

        fn set_status(&self, _update: &StatusUpdate) -> BoardFuture<'_, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn records_results_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "acme/widgets#3")));
        let board = RecordingBoardClient::new(Box::new(StubBoard), Arc::clone(&recorder));

        assert!(board.fetch_fields().await.is_err());
        assert!(board.list_items().await.is_ok());
        let update = StatusUpdate {
            project_id: "PVT_1".into(),
            item_id: ItemId::new("PVTI_1"),
            field_id: "F_status".into(),
            option_id: OptionId::new("opt_review"),
        };
        board.set_status(&update).await.unwrap();
        drop(board);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let cassette = crate::cassette::format::Cassette::load(&path).unwrap();
        let methods: Vec<_> = cassette.interactions.iter().map(|i| i.method.as_str()).collect();
        assert_eq!(methods, ["fetch_fields", "list_items", "set_status"]);
        assert_eq!(
            cassette.interactions[0].output,
            serde_json::json!({"Err": "board response contained no project data"})
        );
        assert_eq!(cassette.interactions[1].output["Ok"]["title"], "Roadmap");
        assert_eq!(cassette.interactions[2].input["option_id"], "opt_review");
    }
}
