//! Move actions with conflict resolution.
//!
//! A conflicting folder is merged into the existing one by moving its
//! children; once everything below it moved, the emptied source folder is
//! deleted. A conflicting file is reported as a failed outcome instead of
//! an error so the rest of the batch can still be reported.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info};

use nodeactions_core::{ActionError, NodeEntry, NodeId};

use crate::context::{ActionContext, entry_id};
use crate::outcome::{NodeResult, Outcome};

impl ActionContext {
    /// Move one selected entry into `target`.
    ///
    /// For folders that end up merged into an existing destination folder,
    /// the source folder left behind at the original location is deleted
    /// when every node below it moved successfully.
    pub(crate) fn move_node_action<'a>(
        &'a self,
        entry: &'a NodeEntry,
        target: &'a NodeId,
    ) -> BoxFuture<'a, Result<Outcome, ActionError>> {
        if !entry.is_folder {
            return self.move_content_action(entry, target).boxed();
        }

        async move {
            let outcome = self.move_folder_action(entry, target).await?;

            let Some(initial_parent_id) = entry.parent_ref() else {
                return Ok(outcome);
            };
            if initial_parent_id == target || outcome.has_failure() {
                return Ok(outcome);
            }

            if self
                .get_child_by_name(initial_parent_id, &entry.name)
                .await?
                .is_some()
            {
                let id = entry_id(entry)?;
                self.api.delete_node(id).await?;
                info!(node = %id, name = %entry.name, parent = %initial_parent_id, "Deleted merged source folder");
                self.deleted.lock().await.push(entry.clone());
            }

            Ok(outcome)
        }
        .boxed()
    }

    /// Move a folder; on conflict, move its children into the existing folder.
    pub(crate) fn move_folder_action<'a>(
        &'a self,
        entry: &'a NodeEntry,
        target: &'a NodeId,
    ) -> BoxFuture<'a, Result<Outcome, ActionError>> {
        async move {
            let id = entry_id(entry)?;
            let initial_parent_id = entry.parent_ref().cloned();

            match self.api.move_node(id, target).await {
                Ok(moved) => return Ok(Outcome::Success(NodeResult::moved(moved, initial_parent_id))),
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
                .try_each_entry(&children, |child| {
                    if child.is_folder {
                        self.move_folder_action(child, &destination_id)
                    } else {
                        self.move_content_action(child, &destination_id).boxed()
                    }
                })
                .await?;

            Ok(Outcome::Aggregate(outcomes))
        }
        .boxed()
    }

    /// Move a file. A name conflict becomes a failed outcome, not an error.
    pub(crate) async fn move_content_action(
        &self,
        entry: &NodeEntry,
        target: &NodeId,
    ) -> Result<Outcome, ActionError> {
        let id = entry_id(entry)?;
        let initial_parent_id = entry.parent_ref().cloned();

        match self.api.move_node(id, target).await {
            Ok(moved) => Ok(Outcome::Success(NodeResult::moved(moved, initial_parent_id))),
            Err(err) if err.is_conflict() => {
                debug!(node = %id, %target, name = %entry.name, "Name taken, file not moved");
                Ok(Outcome::Failed(err))
            }
            Err(err) => Err(err),
        }
    }
}
