//! Task text derived from an item.

use super::item::{Item, ItemId};

/// Derives the task description from an item's title and body.
///
/// Empty strings count as absent. Returns `None` when neither is present;
/// such items are not executable.
#[must_use]
pub fn extract_task_text(title: Option<&str>, body: Option<&str>) -> Option<String> {
    let title = title.filter(|t| !t.is_empty());
    let body = body.filter(|b| !b.is_empty());
    match (title, body) {
        (Some(title), Some(body)) => Some(format!("{title}\n\n{body}")),
        (Some(text), None) | (None, Some(text)) => Some(text.to_string()),
        (None, None) => None,
    }
}

/// An executable task. Lives for one execution attempt and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Item the task came from.
    pub item_id: ItemId,
    /// Item title, kept for summaries. Empty titles are kept as they are.
    pub title: Option<String>,
    /// Task description handed to the agent.
    pub text: String,
}

impl Task {
    /// Builds the task for an item, or `None` if the item has no usable content.
    #[must_use]
    pub fn from_item(item: &Item) -> Option<Self> {
        let text = extract_task_text(item.title(), item.body())?;
        Some(Self {
            item_id: item.id.clone(),
            title: item.title().map(String::from),
            text,
        })
    }
}
