//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the polling engine and an
//! external system (board service, task agent, notification channel,
//! time, filesystem). Implementations live in `src/adapters/`.

pub mod agent;
pub mod board;
pub mod clock;
pub mod filesystem;
pub mod notifier;

pub use agent::{AgentFuture, AgentOutput, TaskAgent};
pub use board::{BoardClient, BoardFuture};
pub use clock::Clock;
pub use filesystem::FileSystem;
pub use notifier::{Notification, NotificationField, Notifier, NotifyFuture, Tone};
