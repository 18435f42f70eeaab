//! In-memory fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use board_pilot::config::{BoardCoordinates, Config};
use board_pilot::context::ServiceContext;
use board_pilot::error::{AgentError, BoardError, NotifyError};
use board_pilot::model::{
    BoardSnapshot, FieldDefinition, FieldOption, FieldValue, Item, ItemContent, ItemId,
    LinkedContent, OptionId, ProjectFields, StatusUpdate,
};
use board_pilot::ports::{
    AgentFuture, AgentOutput, BoardClient, BoardFuture, Clock, FileSystem, Notification, Notifier,
    NotifyFuture, TaskAgent,
};

pub const BACKLOG: &str = "opt_backlog";
pub const REVIEW: &str = "opt_review";
pub const DONE: &str = "opt_done";

/// Field definitions of a board with Backlog, Review and Done options.
pub fn fields() -> ProjectFields {
    let option = |id: &str, name: &str| FieldOption { id: OptionId::new(id), name: name.into() };
    ProjectFields {
        project_id: Some("PVT_1".into()),
        fields: vec![FieldDefinition {
            id: "F_status".into(),
            name: "Status".into(),
            options: vec![
                option(BACKLOG, "Backlog"),
                option(REVIEW, "Review"),
                option(DONE, "Done"),
            ],
        }],
    }
}

fn option_name(option: &str) -> &'static str {
    match option {
        BACKLOG => "Backlog",
        REVIEW => "Review",
        _ => "Done",
    }
}

/// An issue item, optionally in a status option.
pub fn issue(id: &str, number: u64, title: &str, status: Option<&str>) -> Item {
    Item {
        id: ItemId::new(id),
        content: Some(ItemContent::Issue(LinkedContent {
            number,
            title: title.into(),
            body: Some(format!("Details for {title}")),
            state: "OPEN".into(),
            url: format!("https://example.com/acme/widgets/issues/{number}"),
        })),
        field_values: status
            .map(|option| FieldValue::SingleSelect {
                field: "Status".into(),
                field_id: Some("F_status".into()),
                name: option_name(option).into(),
                option_id: OptionId::new(option),
            })
            .into_iter()
            .collect(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

/// A draft with neither title nor body.
pub fn empty_draft(id: &str) -> Item {
    Item {
        id: ItemId::new(id),
        content: Some(ItemContent::DraftIssue { title: String::new(), body: None }),
        field_values: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct BoardState {
    fields: Option<ProjectFields>,
    items: Vec<Item>,
    list_fails: bool,
    updates_fail: bool,
    list_calls: usize,
    updates: Vec<StatusUpdate>,
}

/// Board whose contents the test controls.
#[derive(Clone, Default)]
pub struct FakeBoard {
    state: Arc<Mutex<BoardState>>,
}

impl FakeBoard {
    pub fn with_fields(fields: ProjectFields) -> Self {
        let board = Self::default();
        board.state.lock().unwrap().fields = Some(fields);
        board
    }

    pub fn show(&self, items: Vec<Item>) {
        self.state.lock().unwrap().items = items;
    }

    pub fn set_list_fails(&self, fails: bool) {
        self.state.lock().unwrap().list_fails = fails;
    }

    pub fn set_updates_fail(&self, fails: bool) {
        self.state.lock().unwrap().updates_fail = fails;
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

impl BoardClient for FakeBoard {
    fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields> {
        let fields = self.state.lock().unwrap().fields.clone();
        Box::pin(async move {
            fields.ok_or_else(|| BoardError::Network("connection refused".into()))
        })
    }

    fn list_items(&self) -> BoardFuture<'_, BoardSnapshot> {
        let result = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            if state.list_fails {
                Err(BoardError::Transport { status: 502, body: "bad gateway".into() })
            } else {
                Ok(BoardSnapshot {
                    title: Some("Roadmap".into()),
                    total_count: state.items.len(),
                    items: state.items.clone(),
                })
            }
        };
        Box::pin(async move { result })
    }

    fn set_status(&self, update: &StatusUpdate) -> BoardFuture<'_, ()> {
        let result = {
            let mut state = self.state.lock().unwrap();
            state.updates.push(update.clone());
            if state.updates_fail {
                Err(BoardError::Api(vec!["field is read-only".into()]))
            } else {
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}

#[derive(Default)]
struct AgentState {
    exit_codes: VecDeque<i32>,
    delay: Option<Duration>,
    prompts: Vec<String>,
}

/// Agent that answers with scripted exit codes (0 once the script runs out).
#[derive(Clone, Default)]
pub struct FakeAgent {
    state: Arc<Mutex<AgentState>>,
}

impl FakeAgent {
    pub fn exit_with(&self, codes: &[i32]) {
        self.state.lock().unwrap().exit_codes.extend(codes);
    }

    pub fn hang_for(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().prompts.clone()
    }
}

impl TaskAgent for FakeAgent {
    fn run(&self, prompt: &str) -> AgentFuture<'_> {
        let (code, delay) = {
            let mut state = self.state.lock().unwrap();
            state.prompts.push(prompt.to_string());
            (state.exit_codes.pop_front().unwrap_or(0), state.delay)
        };
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, AgentError>(AgentOutput {
                exit_code: Some(code),
                stdout: "done".into(),
                stderr: String::new(),
            })
        })
    }
}

/// Notifier that keeps everything it was asked to send.
#[derive(Clone, Default)]
pub struct FakeNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for FakeNotifier {
    fn send(&self, notification: &Notification) -> NotifyFuture<'_> {
        self.sent.lock().unwrap().push(notification.clone());
        Box::pin(async { Ok::<_, NotifyError>(()) })
    }
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The instant [`FixedClock`] reports in these tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Filesystem backed by a map.
#[derive(Clone, Default)]
pub struct MemoryFs {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    read_only: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemoryFs {
    /// Makes every later write or append to `path` fail.
    pub fn make_read_only(&self, path: &str) {
        self.read_only.lock().unwrap().push(PathBuf::from(path));
    }

    fn check_writable(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.read_only.lock().unwrap().iter().any(|p| p == path) {
            return Err(format!("read-only file system: {}", path.display()).into());
        }
        Ok(())
    }

    pub fn put(&self, path: &str, contents: &str) {
        self.files.lock().unwrap().insert(PathBuf::from(path), contents.to_string());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemoryFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no such file: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.check_writable(path)?;
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn append(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.check_writable(path)?;
        self.files.lock().unwrap().entry(path.to_path_buf()).or_default().push_str(contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

pub fn config() -> Config {
    let mut config = Config::new(
        BoardCoordinates { owner: "acme".into(), repo: "widgets".into(), project_number: 3 },
        "test-token",
    );
    config.agent.timeout = Duration::from_secs(5);
    config
}

/// A context wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub ctx: ServiceContext,
    pub config: Config,
    pub board: FakeBoard,
    pub agent: FakeAgent,
    pub notifier: FakeNotifier,
    pub fs: MemoryFs,
}

impl Harness {
    pub fn new(board: FakeBoard) -> Self {
        let agent = FakeAgent::default();
        let notifier = FakeNotifier::default();
        let fs = MemoryFs::default();
        let ctx = ServiceContext {
            board: Box::new(board.clone()),
            agent: Box::new(agent.clone()),
            notifier: Box::new(notifier.clone()),
            clock: Box::new(FixedClock(now())),
            fs: Box::new(fs.clone()),
        };
        Self { ctx, config: config(), board, agent, notifier, fs }
    }

    pub fn resolved() -> Self {
        Self::new(FakeBoard::with_fields(fields()))
    }
}
