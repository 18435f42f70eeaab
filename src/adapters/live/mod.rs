//! Live adapters for real external interactions.

use std::time::Duration;

use log::warn;
use reqwest::Client;

pub mod agent;
pub mod board;
pub mod clock;
pub mod filesystem;
pub(crate) mod graphql;
pub mod notifier;

/// HTTP client whose requests give up after `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
        warn!("event=http_client status=fallback error={err}");
        Client::new()
    })
}
