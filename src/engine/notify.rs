//! Builds and dispatches item notifications.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::config::BoardCoordinates;
use crate::model::{FieldSchema, FieldValue, Item, Task};
use crate::ports::{Notification, NotificationField, Notifier, Tone};

/// Characters of task text shown in a notification.
pub const PREVIEW_CHARS: usize = 200;

/// What happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Selected for hand-off to a later pipeline step.
    Discovered,
    /// Moved to in-review, waiting for the pipeline's agent.
    Queued,
    /// The agent finished with exit code 0.
    Succeeded,
    /// The agent failed, timed out, or could not start.
    Failed,
}

impl EventKind {
    fn title(self) -> &'static str {
        match self {
            Self::Discovered => "New task discovered",
            Self::Queued => "Task queued for agent",
            Self::Succeeded => "Task completed",
            Self::Failed => "Task failed",
        }
    }

    fn tone(self) -> Tone {
        match self {
            Self::Discovered | Self::Succeeded => Tone::Success,
            Self::Queued => Tone::Info,
            Self::Failed => Tone::Failure,
        }
    }
}

/// Everything a notification about one item can show.
#[derive(Debug, Clone)]
pub struct ItemEvent<'a> {
    /// What happened.
    pub kind: EventKind,
    /// The board item.
    pub item: &'a Item,
    /// The task extracted from it.
    pub task: &'a Task,
    /// Display name of the item's status option, if any.
    pub stage: Option<&'a str>,
    /// Agent run time.
    pub duration: Option<Duration>,
    /// Result of the follow-up board update.
    pub board_update: Option<String>,
    /// Failure detail.
    pub reason: Option<String>,
}

impl<'a> ItemEvent<'a> {
    /// An event with no optional details.
    #[must_use]
    pub fn new(kind: EventKind, item: &'a Item, task: &'a Task, schema: &FieldSchema) -> Self {
        Self {
            kind,
            item,
            task,
            stage: status_name(item, schema),
            duration: None,
            board_update: None,
            reason: None,
        }
    }
}

/// Display name of the status option selected on `item`.
#[must_use]
pub fn status_name<'a>(item: &'a Item, schema: &FieldSchema) -> Option<&'a str> {
    let selected = schema.status_of(item)?;
    item.field_values.iter().find_map(|value| match value {
        FieldValue::SingleSelect { name, option_id, .. } if option_id == selected => {
            Some(name.as_str())
        }
        _ => None,
    })
}

/// Truncates `text` to [`PREVIEW_CHARS`] characters, marking the cut.
#[must_use]
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Renders an event as a notification.
#[must_use]
pub fn build_notification(
    event: &ItemEvent<'_>,
    board: &BoardCoordinates,
    now: DateTime<Utc>,
) -> Notification {
    let kind_label = event.item.kind().map_or("Item", |k| k.label());
    let title = event.task.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled");

    let mut fields = Vec::new();
    let mut push = |name: &str, value: String, inline: bool| {
        fields.push(NotificationField { name: name.to_string(), value, inline });
    };

    if let Some(linked) = event.item.content.as_ref().and_then(|c| c.linked()) {
        push("Number", format!("#{}", linked.number), true);
        push("State", linked.state.clone(), true);
    }
    if let Some(stage) = event.stage {
        push("Stage", stage.to_string(), true);
    }
    if let Some(duration) = event.duration {
        push("Duration", format!("{:.1}s", duration.as_secs_f64()), true);
    }
    if let Some(update) = &event.board_update {
        push("Board update", update.clone(), true);
    }
    if let Some(reason) = &event.reason {
        push("Reason", reason.clone(), false);
    }
    if let Some(linked) = event.item.content.as_ref().and_then(|c| c.linked()) {
        push("Link", linked.url.clone(), false);
    }
    push("Preview", preview(&event.task.text), false);

    Notification {
        title: event.kind.title().to_string(),
        description: format!("**{kind_label}:** {title}"),
        tone: event.kind.tone(),
        fields,
        timestamp: now,
        footer: format!("Board Pilot - {}/{}", board.owner, board.repo),
    }
}

/// Sends a notification. Delivery failures are logged and dropped.
pub async fn dispatch(notifier: &dyn Notifier, notification: &Notification) {
    match notifier.send(notification).await {
        Ok(()) => debug!("event=notify status=sent title={:?}", notification.title),
        Err(err) => warn!("event=notify status=failed title={:?} error={err}", notification.title),
    }
}
