//! Board items as returned by the board service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, service-assigned identifier of a board item.
///
/// Stable for the lifetime of the item; used as the key of both the
/// in-memory known set and the persisted ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque identifier of a single-select option on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    /// Wraps a raw option identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw option identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of content an item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A repository issue.
    Issue,
    /// A repository pull request.
    PullRequest,
    /// A draft note that only exists on the board.
    DraftIssue,
}

impl ItemKind {
    /// Human-readable label used in logs and notifications.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "Pull Request",
            Self::DraftIssue => "Draft Issue",
        }
    }
}

/// Fields shared by issues and pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedContent {
    /// Repository-scoped number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Body text, when present.
    pub body: Option<String>,
    /// Repository state (e.g. `OPEN`, `CLOSED`).
    pub state: String,
    /// Web URL.
    pub url: String,
}

/// Content attached to a board item.
///
/// The variant is assigned once, from the service's own type discriminator,
/// when the response is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemContent {
    /// Content backed by a repository issue.
    Issue(LinkedContent),
    /// Content backed by a repository pull request.
    PullRequest(LinkedContent),
    /// Board-only draft.
    DraftIssue {
        /// Title.
        title: String,
        /// Body text, when present.
        body: Option<String>,
    },
}

impl ItemContent {
    /// Returns the kind of this content.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Issue(_) => ItemKind::Issue,
            Self::PullRequest(_) => ItemKind::PullRequest,
            Self::DraftIssue { .. } => ItemKind::DraftIssue,
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Issue(linked) | Self::PullRequest(linked) => &linked.title,
            Self::DraftIssue { title, .. } => title,
        }
    }

    /// Returns the body text, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Issue(linked) | Self::PullRequest(linked) => linked.body.as_deref(),
            Self::DraftIssue { body, .. } => body.as_deref(),
        }
    }

    /// Returns the linked issue or pull request, if this is not a draft.
    #[must_use]
    pub fn linked(&self) -> Option<&LinkedContent> {
        match self {
            Self::Issue(linked) | Self::PullRequest(linked) => Some(linked),
            Self::DraftIssue { .. } => None,
        }
    }
}

/// A single field value set on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free-text field.
    Text {
        /// Name of the field.
        field: String,
        /// Value.
        text: String,
    },
    /// Single-select field.
    SingleSelect {
        /// Name of the field.
        field: String,
        /// Identifier of the field, when the service returned it.
        field_id: Option<String>,
        /// Display name of the selected option.
        name: String,
        /// Identifier of the selected option.
        option_id: OptionId,
    },
}

impl FieldValue {
    /// Returns the name of the field this value belongs to.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::Text { field, .. } | Self::SingleSelect { field, .. } => field,
        }
    }

    /// Returns a display string for the value.
    #[must_use]
    pub fn display_value(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::SingleSelect { name, .. } => name,
        }
    }
}

/// A work item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Service-assigned identifier.
    pub id: ItemId,
    /// Attached content; `None` when the service redacts it.
    pub content: Option<ItemContent>,
    /// Field values set on the item.
    #[serde(default)]
    pub field_values: Vec<FieldValue>,
    /// When the item was added to the board.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Returns the content title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.content.as_ref().map(ItemContent::title)
    }

    /// Returns the content body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.content.as_ref().and_then(ItemContent::body)
    }

    /// Returns the content kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ItemKind> {
        self.content.as_ref().map(ItemContent::kind)
    }

    /// Finds the selected option of a single-select field.
    ///
    /// The field is matched by identifier when one is given, otherwise by name.
    #[must_use]
    pub fn selected_option(&self, field_id: Option<&str>, field_name: &str) -> Option<&OptionId> {
        self.field_values.iter().find_map(|value| match value {
            FieldValue::SingleSelect { field, field_id: value_field_id, option_id, .. } => {
                let matches = match (field_id, value_field_id.as_deref()) {
                    (Some(wanted), Some(actual)) => wanted == actual,
                    _ => field == field_name,
                };
                matches.then_some(option_id)
            }
            FieldValue::Text { .. } => None,
        })
    }
}

/// The full item list of one board read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Board title, when available.
    pub title: Option<String>,
    /// Items visible in this read (at most one page).
    pub items: Vec<Item>,
    /// Total number of items the service reports on the board.
    pub total_count: usize,
}

impl BoardSnapshot {
    /// Looks up an item by identifier.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns `true` when the service holds more items than this read returned.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total_count > self.items.len()
    }
}
