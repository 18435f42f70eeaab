//! Decides which new items are handed to the agent.

use log::debug;

use crate::model::{FieldSchema, Item, Stage, Task};

/// Why an item is or is not eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The item sits in the pending stage.
    Pending,
    /// The item has no status value.
    Unstaged,
    /// The pending option never resolved, so nothing is filtered out.
    Unfiltered,
    /// The item is in another stage, known or not.
    NotPending(Option<Stage>),
}

impl Eligibility {
    /// Returns `true` if the item should be executed.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        !matches!(self, Self::NotPending(_))
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Unstaged => "unstaged",
            Self::Unfiltered => "unfiltered",
            Self::NotPending(Some(stage)) => stage.label(),
            Self::NotPending(None) => "other-stage",
        }
    }
}

/// Classifies one item against the resolved schema.
///
/// An item without a status value is always eligible, whatever the
/// schema resolved to.
#[must_use]
pub fn classify(item: &Item, schema: &FieldSchema) -> Eligibility {
    let Some(status) = schema.status_of(item) else {
        return Eligibility::Unstaged;
    };
    match &schema.pending {
        None => Eligibility::Unfiltered,
        Some(pending) if pending == status => Eligibility::Pending,
        Some(_) => Eligibility::NotPending(schema.stage_of(status)),
    }
}

/// New items split by what will happen to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Executable tasks in board order.
    pub tasks: Vec<Task>,
    /// Eligible items with neither title nor body.
    pub skipped_empty: usize,
    /// Items outside the pending stage.
    pub ineligible: usize,
}

/// Filters `items` down to executable tasks.
pub fn select<'a, I>(items: I, schema: &FieldSchema) -> Selection
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut selection = Selection::default();
    for item in items {
        let verdict = classify(item, schema);
        if !verdict.is_eligible() {
            debug!("event=item_skipped item={} reason={}", item.id, verdict.label());
            selection.ineligible += 1;
            continue;
        }
        match Task::from_item(item) {
            Some(task) => {
                debug!("event=item_selected item={} reason={}", item.id, verdict.label());
                selection.tasks.push(task);
            }
            None => {
                debug!("event=item_skipped item={} reason=no-content", item.id);
                selection.skipped_empty += 1;
            }
        }
    }
    selection
}
