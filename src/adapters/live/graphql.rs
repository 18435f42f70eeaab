//! GraphQL documents and wire types of the board service.
//!
//! Union members are decoded through their `__typename`, so item kinds
//! come from the service's own discriminator rather than field shape.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::BoardError;
use crate::model::{
    BoardSnapshot, FieldDefinition, FieldOption, FieldValue, Item, ItemContent, ItemId,
    LinkedContent, OptionId, ProjectFields,
};

/// Fetches the board id and its field definitions.
pub(crate) const FIELDS_QUERY: &str = r"
query($owner: String!, $repo: String!, $projectNumber: Int!) {
  repository(owner: $owner, name: $repo) {
    projectV2(number: $projectNumber) {
      id
      fields(first: 20) {
        nodes {
          __typename
          ... on ProjectV2Field { id name }
          ... on ProjectV2SingleSelectField { id name options { id name } }
        }
      }
    }
  }
}";

/// Fetches the first page of items with content and field values.
pub(crate) const ITEMS_QUERY: &str = r"
query($owner: String!, $repo: String!, $projectNumber: Int!) {
  repository(owner: $owner, name: $repo) {
    projectV2(number: $projectNumber) {
      title
      items(first: 100) {
        totalCount
        nodes {
          id
          createdAt
          content {
            __typename
            ... on Issue { number title body state url }
            ... on PullRequest { number title body state url }
            ... on DraftIssue { title body }
          }
          fieldValues(first: 10) {
            nodes {
              __typename
              ... on ProjectV2ItemFieldTextValue {
                text
                field { ... on ProjectV2Field { id name } }
              }
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                optionId
                field { ... on ProjectV2SingleSelectField { id name } }
              }
            }
          }
        }
      }
    }
  }
}";

/// Sets a single-select value on an item.
pub(crate) const SET_STATUS_MUTATION: &str = r"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $projectId
      itemId: $itemId
      fieldId: $fieldId
      value: { singleSelectOptionId: $optionId }
    }
  ) {
    projectV2Item { id }
  }
}";

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<ErrorEntry>>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Decodes a 2xx response body, surfacing an embedded error list.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BoardError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| BoardError::Decode(e.to_string()))?;
    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(BoardError::Api(errors.into_iter().map(|e| e.message).collect()));
    }
    envelope.data.ok_or(BoardError::MissingData)
}

#[derive(Deserialize)]
pub(crate) struct RepositoryData<P> {
    repository: Option<RepositoryNode<P>>,
}

#[derive(Deserialize)]
struct RepositoryNode<P> {
    #[serde(rename = "projectV2")]
    project: Option<P>,
}

impl<P> RepositoryData<P> {
    /// Unwraps `repository.projectV2`.
    pub(crate) fn into_project(self) -> Result<P, BoardError> {
        self.repository.and_then(|repo| repo.project).ok_or(BoardError::MissingData)
    }
}

#[derive(Deserialize)]
pub(crate) struct FieldsProject {
    id: Option<String>,
    fields: NodeList<FieldNode>,
}

#[derive(Deserialize)]
struct NodeList<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

#[derive(Deserialize)]
struct FieldNode {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    options: Vec<OptionNode>,
}

#[derive(Deserialize)]
struct OptionNode {
    id: String,
    name: String,
}

impl FieldsProject {
    pub(crate) fn into_fields(self) -> ProjectFields {
        let fields = self
            .fields
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| {
                Some(FieldDefinition {
                    id: node.id?,
                    name: node.name?,
                    options: node
                        .options
                        .into_iter()
                        .map(|o| FieldOption { id: OptionId::new(o.id), name: o.name })
                        .collect(),
                })
            })
            .collect();
        ProjectFields { project_id: self.id, fields }
    }
}

#[derive(Deserialize)]
pub(crate) struct ItemsProject {
    title: Option<String>,
    items: ItemConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemConnection {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    nodes: Vec<Option<ItemNode>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNode {
    id: String,
    created_at: DateTime<Utc>,
    content: Option<ContentNode>,
    field_values: Option<NodeList<FieldValueNode>>,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum ContentNode {
    Issue(LinkedNode),
    PullRequest(LinkedNode),
    DraftIssue {
        title: String,
        body: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct LinkedNode {
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    url: String,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum FieldValueNode {
    #[serde(rename = "ProjectV2ItemFieldTextValue")]
    Text {
        text: Option<String>,
        #[serde(default)]
        field: FieldRef,
    },
    #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
    SingleSelect {
        name: Option<String>,
        #[serde(rename = "optionId")]
        option_id: Option<String>,
        #[serde(default)]
        field: FieldRef,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Default)]
struct FieldRef {
    id: Option<String>,
    name: Option<String>,
}

impl ItemsProject {
    pub(crate) fn into_snapshot(self) -> BoardSnapshot {
        let items: Vec<Item> = self.items.nodes.into_iter().flatten().map(ItemNode::into_item).collect();
        BoardSnapshot { title: self.title, total_count: self.items.total_count.max(items.len()), items }
    }
}

impl ItemNode {
    fn into_item(self) -> Item {
        let content = self.content.and_then(|node| match node {
            ContentNode::Issue(linked) => Some(ItemContent::Issue(linked.into())),
            ContentNode::PullRequest(linked) => Some(ItemContent::PullRequest(linked.into())),
            ContentNode::DraftIssue { title, body } => Some(ItemContent::DraftIssue { title, body }),
            ContentNode::Other => None,
        });
        let field_values = self
            .field_values
            .map(|list| list.nodes.into_iter().flatten().filter_map(FieldValueNode::into_value).collect())
            .unwrap_or_default();
        Item { id: ItemId::new(self.id), content, field_values, created_at: self.created_at }
    }
}

impl From<LinkedNode> for LinkedContent {
    fn from(node: LinkedNode) -> Self {
        Self { number: node.number, title: node.title, body: node.body, state: node.state, url: node.url }
    }
}

impl FieldValueNode {
    fn into_value(self) -> Option<FieldValue> {
        match self {
            Self::Text { text, field } => {
                Some(FieldValue::Text { field: field.name?, text: text.unwrap_or_default() })
            }
            Self::SingleSelect { name, option_id, field } => Some(FieldValue::SingleSelect {
                field: field.name?,
                field_id: field.id,
                name: name.unwrap_or_default(),
                option_id: OptionId::new(option_id?),
            }),
            Self::Other => None,
        }
    }
}
