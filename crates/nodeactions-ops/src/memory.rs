//! In-memory content repository.
//!
//! Implements [`ContentApi`] over an ordered node table with the same
//! failure modes as a remote repository: 404 for unknown nodes, 409 for
//! same-named siblings. Every call is logged so callers can assert on the
//! exact requests a batch issued.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use nodeactions_core::{ActionError, NodeEntry, NodeId, NodePaging};

use crate::api::ContentApi;

/// A request received by an [`InMemoryContentApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    GetChildren {
        parent_id: NodeId,
        skip_count: usize,
    },
    Copy {
        node_id: NodeId,
        target_parent_id: NodeId,
        name: Option<String>,
    },
    Move {
        node_id: NodeId,
        target_parent_id: NodeId,
    },
    Delete {
        node_id: NodeId,
    },
}

impl ApiCall {
    /// Check if this call changes the repository.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetChildren { .. })
    }
}

/// Serializable content of a repository, parents before children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub nodes: Vec<NodeEntry>,
}

/// Errors reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid snapshot {path}: parent chain of {node} loops")]
    Cycle { path: PathBuf, node: NodeId },
}

impl RepositorySnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&data).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        match snapshot.find_cycle() {
            Some(node) => Err(SnapshotError::Cycle {
                path: path.to_path_buf(),
                node: node.clone(),
            }),
            None => Ok(snapshot),
        }
    }

    /// A node whose parent chain loops, if any.
    pub fn find_cycle(&self) -> Option<&NodeId> {
        let parents: HashMap<&NodeId, &NodeId> = self
            .nodes
            .iter()
            .filter_map(|node| node.parent_id.as_ref().map(|parent| (&node.id, parent)))
            .collect();

        self.nodes.iter().map(|node| &node.id).find(|start| {
            let mut current = *start;
            for _ in 0..parents.len() {
                match parents.get(current) {
                    Some(parent) => current = *parent,
                    None => return false,
                }
            }
            parents.contains_key(current)
        })
    }

    /// Write the snapshot to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, data).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Default)]
struct Repository {
    nodes: IndexMap<NodeId, NodeEntry>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: HashMap<NodeId, ActionError>,
}

impl Repository {
    fn insert(&mut self, entry: NodeEntry) {
        self.nodes.insert(entry.id.clone(), entry);
    }

    fn children(&self, parent_id: &NodeId) -> Vec<NodeEntry> {
        self.nodes
            .values()
            .filter(|node| node.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect()
    }

    fn has_child_named(&self, parent_id: &NodeId, name: &str, except: Option<&NodeId>) -> bool {
        self.nodes.values().any(|node| {
            node.parent_id.as_ref() == Some(parent_id)
                && node.name == name
                && Some(&node.id) != except
        })
    }

    /// Check if `node_id` is `ancestor_id` or lies below it.
    ///
    /// A cyclic parent chain counts as within, so nothing is moved or
    /// copied into it.
    fn is_within(&self, node_id: &NodeId, ancestor_id: &NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor_id || !visited.insert(id) {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent_id.as_ref());
        }
        false
    }

    fn fresh_id(&mut self) -> NodeId {
        loop {
            self.next_id += 1;
            let id = NodeId::new(format!("node-{}", self.next_id));
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn source(&self, node_id: &NodeId) -> Result<&NodeEntry, ActionError> {
        if let Some(err) = self.failures.get(node_id) {
            return Err(err.clone());
        }
        self.nodes
            .get(node_id)
            .ok_or_else(|| ActionError::not_found(format!("node {node_id}")))
    }

    fn target_folder(&self, node_id: &NodeId) -> Result<&NodeEntry, ActionError> {
        let target = self
            .nodes
            .get(node_id)
            .ok_or_else(|| ActionError::not_found(format!("target {node_id}")))?;
        if !target.is_folder {
            return Err(ActionError::bad_request(format!("target {node_id} is not a folder")));
        }
        Ok(target)
    }

    fn copy_subtree(&mut self, source_id: &NodeId, target_id: &NodeId, name: &str) -> NodeEntry {
        let mut copy = self.nodes[source_id].clone();
        copy.id = self.fresh_id();
        copy.node_id = None;
        copy.path = None;
        copy.parent_id = Some(target_id.clone());
        copy.name = name.into();
        self.insert(copy.clone());

        if copy.is_folder {
            for child in self.children(source_id) {
                self.copy_subtree(&child.id, &copy.id, &child.name);
            }
        }

        copy
    }

    fn delete_subtree(&mut self, node_id: &NodeId) {
        for child in self.children(node_id) {
            self.delete_subtree(&child.id);
        }
        self.nodes.shift_remove(node_id);
    }
}

/// Content repository held in memory.
#[derive(Debug, Default)]
pub struct InMemoryContentApi {
    repo: Mutex<Repository>,
}

impl InMemoryContentApi {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding the nodes of `snapshot`.
    pub fn from_snapshot(snapshot: RepositorySnapshot) -> Self {
        snapshot
            .nodes
            .into_iter()
            .fold(Self::new(), |api, node| api.with_node(node))
    }

    /// Add a node.
    pub fn with_node(mut self, entry: NodeEntry) -> Self {
        self.repo.get_mut().insert(entry);
        self
    }

    /// Make every copy, move or delete of `node_id` fail with `error`.
    pub fn with_failure(mut self, node_id: impl Into<NodeId>, error: ActionError) -> Self {
        self.repo.get_mut().failures.insert(node_id.into(), error);
        self
    }

    /// Current content of the repository.
    pub async fn snapshot(&self) -> RepositorySnapshot {
        RepositorySnapshot {
            nodes: self.repo.lock().await.nodes.values().cloned().collect(),
        }
    }

    /// Look up a node.
    pub async fn get(&self, node_id: &NodeId) -> Option<NodeEntry> {
        self.repo.lock().await.nodes.get(node_id).cloned()
    }

    /// All children of a node, without logging a call.
    pub async fn children_of(&self, parent_id: &NodeId) -> Vec<NodeEntry> {
        self.repo.lock().await.children(parent_id)
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.repo.lock().await.calls.clone()
    }
}

#[async_trait]
impl ContentApi for InMemoryContentApi {
    async fn get_children(
        &self,
        parent_id: &NodeId,
        skip_count: usize,
        max_items: usize,
    ) -> Result<NodePaging, ActionError> {
        let mut repo = self.repo.lock().await;
        repo.calls.push(ApiCall::GetChildren {
            parent_id: parent_id.clone(),
            skip_count,
        });

        if !repo.nodes.contains_key(parent_id) {
            return Err(ActionError::not_found(format!("node {parent_id}")));
        }
        Ok(NodePaging::slice(&repo.children(parent_id), skip_count, max_items))
    }

    async fn copy_node(
        &self,
        node_id: &NodeId,
        target_parent_id: &NodeId,
        name: Option<&str>,
    ) -> Result<NodeEntry, ActionError> {
        let mut repo = self.repo.lock().await;
        repo.calls.push(ApiCall::Copy {
            node_id: node_id.clone(),
            target_parent_id: target_parent_id.clone(),
            name: name.map(ToOwned::to_owned),
        });

        let source = repo.source(node_id)?;
        let name = name.unwrap_or(source.name.as_str()).to_string();
        repo.target_folder(target_parent_id)?;

        if repo.is_within(target_parent_id, node_id) {
            return Err(ActionError::bad_request(format!("cannot copy {node_id} into itself")));
        }
        if repo.has_child_named(target_parent_id, &name, None) {
            return Err(ActionError::conflict(name));
        }

        Ok(repo.copy_subtree(node_id, target_parent_id, &name))
    }

    async fn move_node(
        &self,
        node_id: &NodeId,
        target_parent_id: &NodeId,
    ) -> Result<NodeEntry, ActionError> {
        let mut repo = self.repo.lock().await;
        repo.calls.push(ApiCall::Move {
            node_id: node_id.clone(),
            target_parent_id: target_parent_id.clone(),
        });

        let name = repo.source(node_id)?.name.clone();
        repo.target_folder(target_parent_id)?;

        if repo.is_within(target_parent_id, node_id) {
            return Err(ActionError::bad_request(format!("cannot move {node_id} into itself")));
        }
        if repo.has_child_named(target_parent_id, &name, Some(node_id)) {
            return Err(ActionError::conflict(name));
        }

        let node = &mut repo.nodes[node_id];
        node.parent_id = Some(target_parent_id.clone());
        node.path = None;
        Ok(node.clone())
    }

    async fn delete_node(&self, node_id: &NodeId) -> Result<(), ActionError> {
        let mut repo = self.repo.lock().await;
        repo.calls.push(ApiCall::Delete {
            node_id: node_id.clone(),
        });

        repo.source(node_id)?;
        repo.delete_subtree(node_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> InMemoryContentApi {
        InMemoryContentApi::new()
            .with_node(NodeEntry::folder("root", "Company Home", "").without_parent_id())
            .with_node(NodeEntry::folder("docs", "docs", "root"))
            .with_node(NodeEntry::file("a", "a.txt", "docs"))
            .with_node(NodeEntry::folder("sub", "sub", "docs"))
            .with_node(NodeEntry::file("b", "b.txt", "sub"))
            .with_node(NodeEntry::folder("archive", "archive", "root"))
    }

    #[tokio::test]
    async fn test_copy_folder_is_deep() {
        let api = repository();
        let copy = api
            .copy_node(&NodeId::new("docs"), &NodeId::new("archive"), None)
            .await
            .unwrap();

        assert_eq!(copy.name, "docs");
        let children = api.children_of(&copy.id).await;
        assert_eq!(children.len(), 2);

        let sub = children.iter().find(|c| c.name == "sub").unwrap();
        assert_eq!(api.children_of(&sub.id).await.len(), 1);
        // Source untouched
        assert_eq!(api.children_of(&NodeId::new("docs")).await.len(), 2);
    }

    #[tokio::test]
    async fn test_same_name_conflicts() {
        let api = repository();
        let err = api
            .copy_node(&NodeId::new("a"), &NodeId::new("docs"), None)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let renamed = api
            .copy_node(&NodeId::new("a"), &NodeId::new("docs"), Some("a-1.txt"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "a-1.txt");
    }

    #[tokio::test]
    async fn test_move_into_own_subtree_is_rejected() {
        let api = repository();
        let err = api
            .move_node(&NodeId::new("docs"), &NodeId::new("sub"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_move_to_current_parent_is_noop() {
        let api = repository();
        let moved = api
            .move_node(&NodeId::new("a"), &NodeId::new("docs"))
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(NodeId::new("docs")));
    }

    #[tokio::test]
    async fn test_delete_removes_subtree() {
        let api = repository();
        api.delete_node(&NodeId::new("docs")).await.unwrap();

        assert!(api.get(&NodeId::new("b")).await.is_none());
        assert_eq!(api.snapshot().await.nodes.len(), 2);
        assert!(api.delete_node(&NodeId::new("docs")).await.is_err());
    }

    #[tokio::test]
    async fn test_paging_and_call_log() {
        let api = repository();
        let page = api.get_children(&NodeId::new("docs"), 1, 1).await.unwrap();

        assert_eq!(page.entries[0].name, "sub");
        assert!(!page.pagination.has_more_items);
        assert_eq!(
            api.calls().await,
            vec![ApiCall::GetChildren {
                parent_id: NodeId::new("docs"),
                skip_count: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let api = repository().with_failure("a", ActionError::server("disk full"));
        let err = api
            .move_node(&NodeId::new("a"), &NodeId::new("archive"))
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::server("disk full"));
    }

    #[tokio::test]
    async fn test_snapshot_file_survives_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.json");

        let api = repository();
        api.copy_node(&NodeId::new("a"), &NodeId::new("archive"), None)
            .await
            .unwrap();
        api.snapshot().await.save(&path).unwrap();

        let reloaded = InMemoryContentApi::from_snapshot(RepositorySnapshot::load(&path).unwrap());
        let archived = reloaded.children_of(&NodeId::new("archive")).await;
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].name, "a.txt");

        // Fresh ids continue past the reloaded ones
        let again = reloaded
            .copy_node(&NodeId::new("b"), &NodeId::new("archive"), None)
            .await
            .unwrap();
        assert_ne!(again.id, archived[0].id);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nodes").unwrap();

        assert!(matches!(
            RepositorySnapshot::load(&path),
            Err(SnapshotError::Json { .. })
        ));
        assert!(matches!(
            RepositorySnapshot::load(dir.path().join("missing.json")),
            Err(SnapshotError::Io { .. })
        ));
    }

    #[test]
    fn test_load_rejects_parent_cycle() {
        let snapshot = RepositorySnapshot {
            nodes: vec![
                NodeEntry::folder("root", "root", "").without_parent_id(),
                NodeEntry::folder("x", "x", "y"),
                NodeEntry::folder("y", "y", "x"),
            ],
        };
        assert_eq!(snapshot.find_cycle(), Some(&NodeId::new("x")));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cycle.json");
        snapshot.save(&path).unwrap();
        assert!(matches!(
            RepositorySnapshot::load(&path),
            Err(SnapshotError::Cycle { .. })
        ));
    }

    #[tokio::test]
    async fn test_cyclic_parents_block_moves() {
        let api = repository()
            .with_node(NodeEntry::folder("x", "x", "y"))
            .with_node(NodeEntry::folder("y", "y", "x"));

        let err = api
            .move_node(&NodeId::new("docs"), &NodeId::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(repository().snapshot().await.find_cycle().is_none());
    }
}
