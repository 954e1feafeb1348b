//! Copy actions with conflict resolution.
//!
//! A conflicting file is retried under a new name; a conflicting folder is
//! merged into the existing one by copying its children into it.

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use nodeactions_core::{ActionError, NodeEntry, NodeId};

use crate::conflict::next_available_name;
use crate::context::{ActionContext, entry_id};
use crate::outcome::{NodeResult, Outcome};

impl ActionContext {
    /// Copy one selected entry into `target`.
    pub(crate) fn copy_node_action<'a>(
        &'a self,
        entry: &'a NodeEntry,
        target: &'a NodeId,
    ) -> BoxFuture<'a, Result<Outcome, ActionError>> {
        if entry.is_folder {
            self.copy_folder_action(entry, target)
        } else {
            self.copy_content_action(entry, target).boxed()
        }
    }

    /// Copy a file, renaming it until the destination accepts the name.
    pub(crate) async fn copy_content_action(
        &self,
        entry: &NodeEntry,
        target: &NodeId,
    ) -> Result<Outcome, ActionError> {
        let id = entry_id(entry)?;
        let mut name = entry.name.to_string();

        for _ in 0..self.config.max_rename_attempts {
            match self.api.copy_node(id, target, Some(name.as_str())).await {
                Ok(copied) => return Ok(Outcome::Success(NodeResult::copied(copied))),
                Err(err) if err.is_conflict() => {
                    let next = next_available_name(&name, Some(entry.name.as_str()));
                    debug!(node = %id, %target, from = %name, to = %next, "Name taken, retrying copy");
                    name = next;
                }
                Err(err) => return Err(err),
            }
        }

        Err(ActionError::RenameExhausted {
            name: entry.name.to_string(),
            attempts: self.config.max_rename_attempts,
        })
    }

    /// Copy a folder; on conflict, copy its children into the existing folder.
    pub(crate) fn copy_folder_action<'a>(
        &'a self,
        entry: &'a NodeEntry,
        target: &'a NodeId,
    ) -> BoxFuture<'a, Result<Outcome, ActionError>> {
        async move {
            let id = entry_id(entry)?;

            match self.api.copy_node(id, target, Some(entry.name.as_str())).await {
                Ok(copied) => return Ok(Outcome::Success(NodeResult::copied(copied))),
                Err(err) if !err.is_conflict() => return Err(err),
                Err(_) => {}
            }

            debug!(node = %id, %target, name = %entry.name, "Folder exists, merging children");
            let destination = self
                .get_child_by_name(target, &entry.name)
                .await?
                .ok_or_else(|| ActionError::not_found(format!("'{}' in {target}", entry.name)))?;
            let destination_id = entry_id(&destination)?.clone();
            let children = self.get_node_children(id).await?;

            let outcomes = self
                .try_each_entry(&children, |child| self.copy_node_action(child, &destination_id))
                .await?;

            Ok(Outcome::Aggregate(outcomes))
        }
        .boxed()
    }
}
