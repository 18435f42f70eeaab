//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default GraphQL endpoint of the board service.
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// Top-level CLI parser for `board-pilot`.
#[derive(Debug, Parser)]
#[command(
    name = "board-pilot",
    version,
    about = "Hand new project-board backlog items to a coding agent"
)]
pub struct Cli {
    /// Board to watch.
    #[command(flatten)]
    pub board: BoardArgs,
    /// Agent invocation.
    #[command(flatten)]
    pub agent: AgentArgs,
    /// Webhook that receives outcome notifications.
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,
    /// Seconds before a board or webhook request is abandoned.
    #[arg(long = "request-timeout", default_value_t = 30)]
    pub request_timeout_secs: u64,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Board coordinates and stage names.
#[derive(Debug, Args)]
pub struct BoardArgs {
    /// Repository owner (user or organization).
    #[arg(long, env = "BOARD_OWNER")]
    pub owner: String,
    /// Repository name.
    #[arg(long, env = "BOARD_REPO")]
    pub repo: String,
    /// Project number within the repository.
    #[arg(long = "project", env = "BOARD_PROJECT_NUMBER")]
    pub project_number: u32,
    /// API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// GraphQL endpoint.
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,
    /// Name of the single-select status field.
    #[arg(long, default_value = "Status")]
    pub status_field: String,
    /// Status option that marks items waiting for the agent.
    #[arg(long, default_value = "Backlog")]
    pub pending_option: String,
    /// Status option items move to after a successful run.
    #[arg(long, default_value = "Review")]
    pub review_option: String,
}

/// How the agent is launched.
#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Agent program.
    #[arg(long = "agent", env = "BOARD_PILOT_AGENT", default_value = "claude")]
    pub program: String,
    /// Arguments placed before the prompt.
    #[arg(
        long = "agent-arg",
        allow_hyphen_values = true,
        default_values = ["--dangerously-skip-permissions", "-p"]
    )]
    pub args: Vec<String>,
    /// Seconds before an agent run is abandoned.
    #[arg(long = "agent-timeout", default_value_t = 600)]
    pub timeout_secs: u64,
    /// Ask the agent to commit and push its changes.
    #[arg(long)]
    pub publish: bool,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the board until interrupted.
    Watch(WatchArgs),
    /// Process new items once, persisting what was seen.
    Once(OnceArgs),
}

/// Options for `watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls.
    #[arg(long, default_value_t = 60)]
    pub interval: u64,
}

/// Options for `once`.
#[derive(Debug, Args)]
pub struct OnceArgs {
    /// Processed-items ledger.
    #[arg(long, default_value = "processed_items.json")]
    pub ledger: PathBuf,
    /// Task summary written when tasks are found.
    #[arg(long, default_value = "claude_tasks.txt")]
    pub summary: PathBuf,
    /// Pipeline output file receiving `has_tasks` and `task_count`.
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,
    /// Queue tasks for a later pipeline step instead of running the agent.
    #[arg(long)]
    pub defer: bool,
}
