//! State shared by the copy and move recursions.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use nodeactions_core::{ActionConfig, ActionError, NodeEntry, NodeId};

use crate::api::ContentApi;
use crate::outcome::Outcome;

/// Repository access and settings for one [`NodeActions`](crate::NodeActions).
pub(crate) struct ActionContext {
    pub(crate) api: Arc<dyn ContentApi>,
    pub(crate) config: ActionConfig,
    /// Folders deleted from their original location by the current move batch.
    pub(crate) deleted: Mutex<Vec<NodeEntry>>,
}

impl ActionContext {
    pub(crate) fn new(api: Arc<dyn ContentApi>, config: ActionConfig) -> Self {
        Self {
            api,
            config,
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// List every child of `parent_id`, following pagination to the end.
    pub(crate) async fn get_node_children(
        &self,
        parent_id: &NodeId,
    ) -> Result<Vec<NodeEntry>, ActionError> {
        let mut children = Vec::new();
        let mut skip_count = Some(0);

        while let Some(offset) = skip_count {
            let page = self
                .api
                .get_children(parent_id, offset, self.config.page_size)
                .await?;
            skip_count = page.next_skip_count();
            children.extend(page.entries);
        }

        Ok(children)
    }

    /// Find the child of `parent_id` called `name`.
    pub(crate) async fn get_child_by_name(
        &self,
        parent_id: &NodeId,
        name: &str,
    ) -> Result<Option<NodeEntry>, ActionError> {
        let children = self.get_node_children(parent_id).await?;
        Ok(children.into_iter().find(|child| child.name == name))
    }

    /// Run one action per entry, at most `max_concurrent_requests` at a time.
    ///
    /// Results keep the order of `entries`. Every entry runs to completion,
    /// whatever its siblings return.
    pub(crate) fn for_each_entry<'a, F>(
        &self,
        entries: &'a [NodeEntry],
        action: F,
    ) -> impl Future<Output = Vec<Result<Outcome, ActionError>>> + Send + 'a
    where
        F: Fn(&'a NodeEntry) -> BoxFuture<'a, Result<Outcome, ActionError>>,
    {
        let futures: Vec<_> = entries.iter().map(action).collect();
        stream::iter(futures)
            .buffered(self.config.max_concurrent_requests)
            .collect::<Vec<_>>()
    }

    /// Run one action per entry and fail with the first error, in entry order.
    ///
    /// Siblings of a failing entry still run to completion.
    pub(crate) fn try_each_entry<'a, F>(
        &self,
        entries: &'a [NodeEntry],
        action: F,
    ) -> impl Future<Output = Result<Vec<Outcome>, ActionError>> + Send + 'a
    where
        F: Fn(&'a NodeEntry) -> BoxFuture<'a, Result<Outcome, ActionError>>,
    {
        self.for_each_entry(entries, action)
            .map(|results| results.into_iter().collect::<Result<Vec<_>, _>>())
    }
}

/// Id of `entry`, or a bad request error naming it.
pub(crate) fn entry_id(entry: &NodeEntry) -> Result<&NodeId, ActionError> {
    entry
        .resolved_id()
        .ok_or_else(|| ActionError::bad_request(format!("Entry '{}' has no id", entry.name)))
}
