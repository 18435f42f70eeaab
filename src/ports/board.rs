//! Board port: reads items and field definitions, writes status values.

use std::future::Future;
use std::pin::Pin;

use crate::error::BoardError;
use crate::model::{BoardSnapshot, ProjectFields, StatusUpdate};

/// Boxed future type alias used by [`BoardClient`] to keep the trait dyn-compatible.
pub type BoardFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoardError>> + Send + 'a>>;

/// Request/response access to the remote project board. Holds no state.
pub trait BoardClient: Send + Sync {
    /// Fetches the board identifier and its field definitions.
    ///
    /// # Errors
    ///
    /// Returns a transport error for non-2xx or network failures and
    /// [`BoardError::Api`] when the service embeds an error list.
    fn fetch_fields(&self) -> BoardFuture<'_, ProjectFields>;

    /// Lists the current items with their content and field values.
    ///
    /// Returns a single page; items beyond the page cap are not visible.
    ///
    /// # Errors
    ///
    /// Same as [`BoardClient::fetch_fields`].
    fn list_items(&self) -> BoardFuture<'_, BoardSnapshot>;

    /// Sets a single-select field on one item.
    ///
    /// # Errors
    ///
    /// Same as [`BoardClient::fetch_fields`].
    fn set_status(&self, update: &StatusUpdate) -> BoardFuture<'_, ()>;
}
