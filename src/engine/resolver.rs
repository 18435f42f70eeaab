//! Resolves status field and option names to board identifiers.

use log::{info, warn};

use crate::model::{FieldSchema, ProjectFields, Stage, StageNames};
use crate::ports::BoardClient;

/// Builds a schema from the board's field definitions.
///
/// Names are matched exactly. Anything not found stays `None`.
#[must_use]
pub fn schema_from_fields(fields: &ProjectFields, names: &StageNames) -> FieldSchema {
    let mut schema = FieldSchema::unresolved(names);
    schema.project_id.clone_from(&fields.project_id);

    let Some(status) = fields.fields.iter().find(|f| f.name == names.status_field) else {
        return schema;
    };
    schema.status_field_id = Some(status.id.clone());

    let option_named = |stage: Stage| {
        status.options.iter().find(|o| o.name == names.option_name(stage)).map(|o| o.id.clone())
    };
    schema.pending = option_named(Stage::Pending);
    schema.in_review = option_named(Stage::InReview);
    schema
}

/// Resolves the schema once at startup.
///
/// Never fails: a failed query yields an unresolved schema and a warning,
/// and filtering downstream becomes permissive.
pub async fn resolve_schema(board: &dyn BoardClient, names: &StageNames) -> FieldSchema {
    let fields = match board.fetch_fields().await {
        Ok(fields) => fields,
        Err(err) => {
            warn!("event=schema_resolve status=failed error={err}");
            return FieldSchema::unresolved(names);
        }
    };

    let schema = schema_from_fields(&fields, names);
    if schema.is_complete() {
        info!(
            "event=schema_resolve status=ok field={} pending={} in_review={}",
            names.status_field, names.pending, names.in_review
        );
    } else {
        warn!(
            "event=schema_resolve status=partial field={} missing={}",
            names.status_field,
            schema.missing().join(",")
        );
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefinition, FieldOption, OptionId};

    fn fields() -> ProjectFields {
        ProjectFields {
            project_id: Some("PVT_1".into()),
            fields: vec![
                FieldDefinition { id: "F_title".into(), name: "Title".into(), options: Vec::new() },
                FieldDefinition {
                    id: "F_status".into(),
                    name: "Status".into(),
                    options: vec![
                        FieldOption { id: OptionId::new("opt_b"), name: "Backlog".into() },
                        FieldOption { id: OptionId::new("opt_p"), name: "In Progress".into() },
                        FieldOption { id: OptionId::new("opt_r"), name: "Review".into() },
                    ],
                },
            ],
        }
    }

    #[test]
    fn resolves_all_identifiers() {
        let schema = schema_from_fields(&fields(), &StageNames::default());
        assert!(schema.is_complete());
        assert_eq!(schema.pending, Some(OptionId::new("opt_b")));
        assert_eq!(schema.in_review, Some(OptionId::new("opt_r")));
        assert_eq!(schema.status_field_id.as_deref(), Some("F_status"));
    }

    #[test]
    fn missing_option_leaves_gap() {
        let names = StageNames { in_review: "Code Review".into(), ..StageNames::default() };
        let schema = schema_from_fields(&fields(), &names);
        assert_eq!(schema.pending, Some(OptionId::new("opt_b")));
        assert!(schema.in_review.is_none());
        assert_eq!(schema.missing(), vec!["in_review_option"]);
    }

    #[test]
    fn missing_status_field_keeps_project_id() {
        let names = StageNames { status_field: "Stage".into(), ..StageNames::default() };
        let schema = schema_from_fields(&fields(), &names);
        assert_eq!(schema.project_id.as_deref(), Some("PVT_1"));
        assert!(schema.status_field_id.is_none());
        assert!(schema.pending.is_none());
        assert_eq!(schema.status_field_name, "Stage");
    }
}
