//! Notification port for reporting outcomes to a chat channel.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::NotifyError;

/// Boxed future type alias used by [`Notifier`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Overall tone of a notification; adapters map it to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    /// Success or discovery.
    Success,
    /// Execution failed.
    Failure,
    /// Informational (e.g. queued for a later step).
    Info,
}

impl Tone {
    /// RGB color code.
    #[must_use]
    pub fn color(self) -> u32 {
        match self {
            Self::Success => 0x002E_CC71,
            Self::Failure => 0x00E7_4C3C,
            Self::Info => 0x0034_98DB,
        }
    }
}

/// One key/value pair of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationField {
    /// Field label.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

/// A structured outcome message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Headline.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Tone.
    pub tone: Tone,
    /// Key/value details.
    pub fields: Vec<NotificationField>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Footer text.
    pub footer: String,
}

/// Delivers notifications. Delivery is fire-and-forget for callers.
pub trait Notifier: Send + Sync {
    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel could not be reached or rejected the message.
    fn send(&self, notification: &Notification) -> NotifyFuture<'_>;
}
