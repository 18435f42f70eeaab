//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::agent::CommandAgent;
use crate::adapters::live::board::GraphQlBoardClient;
use crate::adapters::live::clock::SystemClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::notifier::{DisabledNotifier, WebhookNotifier};
use crate::adapters::recording::{RecordingBoardClient, RecordingTaskAgent};
use crate::adapters::replaying::{ReplayingBoardClient, ReplayingTaskAgent};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::{cassette_file, RecordingSession};
use crate::config::Config;
use crate::ports::{BoardClient, Clock, FileSystem, Notifier, TaskAgent};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Project board.
    pub board: Box<dyn BoardClient>,
    /// Agent that executes tasks.
    pub agent: Box<dyn TaskAgent>,
    /// Outcome notifications.
    pub notifier: Box<dyn Notifier>,
    /// Current time.
    pub clock: Box<dyn Clock>,
    /// Ledger and artifact files.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context from the configuration.
    ///
    /// Without a webhook URL, notifications go to a no-op notifier.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            board: Box::new(GraphQlBoardClient::new(config)),
            agent: Box::new(CommandAgent::new(&config.agent)),
            notifier: live_notifier(config),
            clock: Box::new(SystemClock),
            fs: Box::new(LiveFileSystem),
        }
    }

    /// Creates a live context whose board and agent calls are recorded.
    ///
    /// Cassettes go to a timestamped directory under `root` once the
    /// returned session is finished, after this context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(config: &Config, root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, &config.board.to_string())?;
        let context = Self {
            board: Box::new(RecordingBoardClient::new(
                Box::new(GraphQlBoardClient::new(config)),
                Arc::clone(&session.board),
            )),
            agent: Box::new(RecordingTaskAgent::new(
                Box::new(CommandAgent::new(&config.agent)),
                Arc::clone(&session.agent),
            )),
            notifier: live_notifier(config),
            clock: Box::new(SystemClock),
            fs: Box::new(LiveFileSystem),
        };
        Ok((context, session))
    }

    /// Creates a context that serves board and agent calls from the
    /// cassettes in `dir`.
    ///
    /// Clock and filesystem stay live so ledgers and artifacts behave as in
    /// a normal run. Notifications are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if either cassette cannot be read or parsed.
    pub fn replaying(dir: &Path) -> Result<Self, String> {
        let board = Cassette::load(&dir.join(cassette_file("board")))?;
        let agent = Cassette::load(&dir.join(cassette_file("agent")))?;
        Ok(Self {
            board: Box::new(ReplayingBoardClient::new(CassetteReplayer::new(&board))),
            agent: Box::new(ReplayingTaskAgent::new(CassetteReplayer::new(&agent))),
            notifier: Box::new(DisabledNotifier),
            clock: Box::new(SystemClock),
            fs: Box::new(LiveFileSystem),
        })
    }
}

fn live_notifier(config: &Config) -> Box<dyn Notifier> {
    match &config.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url.clone(), config.request_timeout)),
        None => Box::new(DisabledNotifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaying_requires_both_cassettes() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceContext::replaying(dir.path()).err().unwrap();
        assert!(err.contains("board.cassette.yaml"));
    }
}
