//! Process configuration, built once at startup and passed by reference.

use std::fmt;
use std::time::Duration;

use crate::cli::{Cli, DEFAULT_API_URL};
use crate::error::ConfigError;
use crate::model::StageNames;

/// Identifies the board: repository owner, repository, project number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCoordinates {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Project number.
    pub project_number: u32,
}

impl fmt::Display for BoardCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.project_number)
    }
}

/// How the task agent is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// Program to run.
    pub program: String,
    /// Arguments placed before the prompt.
    pub args: Vec<String>,
    /// Wall-clock bound on one run.
    pub timeout: Duration,
    /// Append the commit-and-push instruction to every prompt.
    pub publish_changes: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            args: vec!["--dangerously-skip-permissions".to_string(), "-p".to_string()],
            timeout: Duration::from_secs(600),
            publish_changes: false,
        }
    }
}

/// Everything the engine needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Board coordinates.
    pub board: BoardCoordinates,
    /// API token.
    pub token: String,
    /// GraphQL endpoint.
    pub api_url: String,
    /// Status field and option names.
    pub stages: StageNames,
    /// Agent invocation.
    pub agent: AgentSettings,
    /// Notification webhook; `None` disables notifications.
    pub webhook_url: Option<String>,
    /// Bound on each board or webhook HTTP request.
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a configuration with defaults for everything but the board and token.
    #[must_use]
    pub fn new(board: BoardCoordinates, token: impl Into<String>) -> Self {
        Self {
            board,
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            stages: StageNames::default(),
            agent: AgentSettings::default(),
            webhook_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Builds the configuration from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no API token was provided.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let token = cli
            .board
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;

        Ok(Self {
            board: BoardCoordinates {
                owner: cli.board.owner.clone(),
                repo: cli.board.repo.clone(),
                project_number: cli.board.project_number,
            },
            token,
            api_url: cli.board.api_url.clone(),
            stages: StageNames {
                status_field: cli.board.status_field.clone(),
                pending: cli.board.pending_option.clone(),
                in_review: cli.board.review_option.clone(),
            },
            agent: AgentSettings {
                program: cli.agent.program.clone(),
                args: cli.agent.args.clone(),
                timeout: Duration::from_secs(cli.agent.timeout_secs),
                publish_changes: cli.agent.publish,
            },
            webhook_url: cli.webhook_url.clone().filter(|url| !url.trim().is_empty()),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
        })
    }
}
