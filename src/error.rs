//! Error types, one enum per external boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the board service.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The request never produced a response.
    #[error("board request failed: {0}")]
    Network(String),
    /// The service answered with a non-2xx status.
    #[error("board returned HTTP {status}: {body}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The service answered 200 but embedded an error list.
    #[error("board reported errors: {}", .0.join("; "))]
    Api(Vec<String>),
    /// The response body could not be decoded.
    #[error("failed to decode board response: {0}")]
    Decode(String),
    /// The response decoded but carried no project.
    #[error("board response contained no project data")]
    MissingData,
    /// An error served from a cassette.
    #[error("{0}")]
    Replayed(String),
}

/// A status transition needs identifiers that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The named part of the schema is missing.
    #[error("status schema is not fully resolved (missing {missing})")]
    Unresolved {
        /// Which identifier is missing.
        missing: &'static str,
    },
}

/// Failures launching or talking to the task agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent process could not be started.
    #[error("failed to launch agent `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An error served from a cassette.
    #[error("{0}")]
    Replayed(String),
}

/// Failures delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The webhook request never produced a response.
    #[error("webhook request failed: {0}")]
    Network(String),
    /// The webhook answered with a status other than 200 or 204.
    #[error("webhook rejected notification with HTTP {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },
}

/// Failures persisting the processed-items ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file could not be written.
    #[error("failed to write ledger {}: {message}", .path.display())]
    Write {
        /// Ledger path.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// The ledger could not be encoded.
    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

/// Top-level error returned by [`crate::run`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Command-line parsing failed.
    #[error("{0}")]
    Usage(String),
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The board could not be read.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// A run artifact (task summary, pipeline outputs) could not be written.
    #[error("failed to write {}: {message}", .path.display())]
    Artifact {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// Recording setup or teardown failed.
    #[error("recording failed: {0}")]
    Recording(String),
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
