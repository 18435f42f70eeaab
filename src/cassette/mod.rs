//! Cassettes: recorded board and agent interactions for offline replay.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
