//! Live adapter for the `BoardClient` port using the GraphQL API.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::graphql::{
    self, FieldsProject, ItemsProject, RepositoryData, FIELDS_QUERY, ITEMS_QUERY,
    SET_STATUS_MUTATION,
};
use super::http_client;
use crate::config::{BoardCoordinates, Config};
use crate::error::BoardError;
use crate::model::{BoardSnapshot, ProjectFields, StatusUpdate};
use crate::ports::board::{BoardClient, BoardFuture};

const API_VERSION: &str = "2022-11-28";

/// Live board client that talks to the GraphQL endpoint.
pub struct GraphQlBoardClient {
    client: Client,
    endpoint: String,
    token: String,
    board: BoardCoordinates,
}

impl GraphQlBoardClient {
    /// Creates a client for the board named in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: http_client(config.request_timeout),
            endpoint: config.api_url.clone(),
            token: config.token.clone(),
            board: config.board.clone(),
        }
    }

    fn board_variables(&self) -> Value {
        json!({
            "owner": self.board.owner,
            "repo": self.board.repo,
            "projectNumber": self.board.project_number,
        })
    }

    /// Posts one GraphQL document and decodes the `data` member.
    async fn execute<T: DeserializeOwned + Send>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, BoardError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("board-pilot/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| BoardError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BoardError::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BoardError::Transport { status: status.as_u16(), body });
        }
        graphql::decode(&body)
    }
}

impl BoardClient for GraphQlBoardClient {
    fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields> {
        Box::pin(async move {
            let data: RepositoryData<FieldsProject> =
                self.execute(FIELDS_QUERY, self.board_variables()).await?;
            Ok(data.into_project()?.into_fields())
        })
    }

    fn list_items(&self) -> BoardFuture<'_, BoardSnapshot> {
        Box::pin(async move {
            let data: RepositoryData<ItemsProject> =
                self.execute(ITEMS_QUERY, self.board_variables()).await?;
            Ok(data.into_project()?.into_snapshot())
        })
    }

    fn set_status(&self, update: &StatusUpdate) -> BoardFuture<'_, ()> {
        let variables = json!({
            "projectId": update.project_id,
            "itemId": update.item_id,
            "fieldId": update.field_id,
            "optionId": update.option_id,
        });
        Box::pin(async move {
            let _: Value = self.execute(SET_STATUS_MUTATION, variables).await?;
            Ok(())
        })
    }
}
