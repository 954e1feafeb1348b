//! Contracts of the collaborators the orchestrator drives.

use async_trait::async_trait;

use nodeactions_core::{ActionError, NodeEntry, NodeId, NodePaging};

/// Remote content repository.
///
/// Failures carry their status code in [`ActionError`]; in particular a
/// same-named sibling at the destination must surface as
/// [`ActionError::Conflict`] so the orchestrator can resolve it.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// List one page of the children of `parent_id`.
    async fn get_children(
        &self,
        parent_id: &NodeId,
        skip_count: usize,
        max_items: usize,
    ) -> Result<NodePaging, ActionError>;

    /// Copy a node into `target_parent_id`, optionally under a new name.
    async fn copy_node(
        &self,
        node_id: &NodeId,
        target_parent_id: &NodeId,
        name: Option<&str>,
    ) -> Result<NodeEntry, ActionError>;

    /// Move a node into `target_parent_id`.
    async fn move_node(
        &self,
        node_id: &NodeId,
        target_parent_id: &NodeId,
    ) -> Result<NodeEntry, ActionError>;

    /// Delete a node and everything below it.
    async fn delete_node(&self, node_id: &NodeId) -> Result<(), ActionError>;
}

/// Answers whether the current user holds a permission on a node.
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, entry: &NodeEntry, permission: &str) -> bool;
}

/// Permission check against the entry's own `allowable_operations`.
///
/// A permission prefixed with `!` is negated: `"!delete"` holds when
/// `delete` is not granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowableOperations;

impl PermissionOracle for AllowableOperations {
    fn has_permission(&self, entry: &NodeEntry, permission: &str) -> bool {
        match permission.strip_prefix('!') {
            Some(denied) => !entry.allows(denied),
            None => entry.allows(permission),
        }
    }
}
