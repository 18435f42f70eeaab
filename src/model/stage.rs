//! The two-stage workflow and its mapping to board option identifiers.
//!
//! Option names ("Backlog", "Review") are only compared here, while
//! building a [`FieldSchema`]. Everything downstream works with [`Stage`]
//! and [`OptionId`].

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId, OptionId};
use crate::error::SchemaError;

/// Workflow stage an item can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting for automated execution.
    Pending,
    /// Executed; waiting for human review.
    InReview,
}

impl Stage {
    /// Short label for logs and notifications.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in-review",
        }
    }
}

/// Human-readable names the board uses for the status field and its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNames {
    /// Name of the single-select status field.
    pub status_field: String,
    /// Option name of [`Stage::Pending`].
    pub pending: String,
    /// Option name of [`Stage::InReview`].
    pub in_review: String,
}

impl Default for StageNames {
    fn default() -> Self {
        Self {
            status_field: "Status".to_string(),
            pending: "Backlog".to_string(),
            in_review: "Review".to_string(),
        }
    }
}

impl StageNames {
    /// Returns the option name configured for a stage.
    #[must_use]
    pub fn option_name(&self, stage: Stage) -> &str {
        match stage {
            Stage::Pending => &self.pending,
            Stage::InReview => &self.in_review,
        }
    }
}

/// One option of a single-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Option identifier.
    pub id: OptionId,
    /// Option display name.
    pub name: String,
}

/// A field defined on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier.
    pub id: String,
    /// Field display name.
    pub name: String,
    /// Options, for single-select fields.
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// Field definitions of a board, as returned by the board service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    /// Board identifier.
    pub project_id: Option<String>,
    /// Field definitions.
    pub fields: Vec<FieldDefinition>,
}

/// A request to set an item's status option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Board identifier.
    pub project_id: String,
    /// Item to update.
    pub item_id: ItemId,
    /// Status field identifier.
    pub field_id: String,
    /// Option to select.
    pub option_id: OptionId,
}

/// Resolved identifiers of the status field and its two stage options.
///
/// Resolved once at startup and read-only afterwards. Any part may be
/// missing; callers degrade instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    /// Board identifier.
    pub project_id: Option<String>,
    /// Status field identifier.
    pub status_field_id: Option<String>,
    /// Status field name, used to find the status value on items when the
    /// field identifier is unknown.
    pub status_field_name: String,
    /// Option identifier of [`Stage::Pending`].
    pub pending: Option<OptionId>,
    /// Option identifier of [`Stage::InReview`].
    pub in_review: Option<OptionId>,
}

impl FieldSchema {
    /// A schema where nothing resolved.
    #[must_use]
    pub fn unresolved(names: &StageNames) -> Self {
        Self { status_field_name: names.status_field.clone(), ..Self::default() }
    }

    /// Returns the option identifier of a stage, if it resolved.
    #[must_use]
    pub fn option_for(&self, stage: Stage) -> Option<&OptionId> {
        match stage {
            Stage::Pending => self.pending.as_ref(),
            Stage::InReview => self.in_review.as_ref(),
        }
    }

    /// Maps an option identifier back to a stage.
    #[must_use]
    pub fn stage_of(&self, option: &OptionId) -> Option<Stage> {
        [Stage::Pending, Stage::InReview]
            .into_iter()
            .find(|stage| self.option_for(*stage) == Some(option))
    }

    /// Returns the status option currently selected on an item.
    #[must_use]
    pub fn status_of<'a>(&self, item: &'a Item) -> Option<&'a OptionId> {
        item.selected_option(self.status_field_id.as_deref(), &self.status_field_name)
    }

    /// Names of the parts that failed to resolve.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_id.is_none() {
            missing.push("project_id");
        }
        if self.status_field_id.is_none() {
            missing.push("status_field_id");
        }
        if self.pending.is_none() {
            missing.push("pending_option");
        }
        if self.in_review.is_none() {
            missing.push("in_review_option");
        }
        missing
    }

    /// Returns `true` when every identifier resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Builds the update that moves an item to `stage`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unresolved`] when the board, the status field,
    /// or the target option did not resolve.
    pub fn update_for(&self, item_id: &ItemId, stage: Stage) -> Result<StatusUpdate, SchemaError> {
        let project_id =
            self.project_id.clone().ok_or(SchemaError::Unresolved { missing: "project_id" })?;
        let field_id = self
            .status_field_id
            .clone()
            .ok_or(SchemaError::Unresolved { missing: "status_field_id" })?;
        let option_id = self.option_for(stage).cloned().ok_or(SchemaError::Unresolved {
            missing: match stage {
                Stage::Pending => "pending_option",
                Stage::InReview => "in_review_option",
            },
        })?;
        Ok(StatusUpdate { project_id, item_id: item_id.clone(), field_id, option_id })
    }
}
