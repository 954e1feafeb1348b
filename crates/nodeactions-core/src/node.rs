//! Content node types.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::action::ContentKind;

/// Identifier of a node in the content repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub CompactString);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// One ancestor on the path from the repository root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    pub id: NodeId,
    #[serde(default)]
    pub name: CompactString,
}

impl PathElement {
    pub fn new(id: impl Into<NodeId>, name: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Path information attached to a node, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathInfo {
    #[serde(default)]
    pub elements: Vec<PathElement>,
}

impl PathInfo {
    /// The direct parent, i.e. the last path element.
    pub fn parent(&self) -> Option<&PathElement> {
        self.elements.last()
    }
}

/// A content entry (file or folder) as returned by the repository.
///
/// Field names follow the repository's JSON representation, so entries can
/// be deserialized straight from listing responses. Every field is optional
/// on the wire; an entry without a usable id is rejected by the batch
/// orchestrator before any remote call is made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    /// Node id.
    #[serde(default)]
    pub id: NodeId,

    /// Id of the underlying node for shared-file entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,

    /// Node name (not full path).
    #[serde(default)]
    pub name: CompactString,

    #[serde(default)]
    pub is_folder: bool,

    #[serde(default)]
    pub is_file: bool,

    /// Direct parent id, when the repository includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,

    /// Ancestor path, when the repository includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathInfo>,

    /// Permission names the current user holds on this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_operations: Vec<CompactString>,
}

impl NodeEntry {
    /// Create a file entry.
    pub fn file(
        id: impl Into<NodeId>,
        name: impl Into<CompactString>,
        parent_id: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_file: true,
            parent_id: Some(parent_id.into()),
            ..Default::default()
        }
    }

    /// Create a folder entry.
    pub fn folder(
        id: impl Into<NodeId>,
        name: impl Into<CompactString>,
        parent_id: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: true,
            parent_id: Some(parent_id.into()),
            ..Default::default()
        }
    }

    /// Set the shared-file node id.
    pub fn with_node_id(mut self, node_id: impl Into<NodeId>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    /// Set the ancestor path.
    pub fn with_path(mut self, elements: Vec<PathElement>) -> Self {
        self.path = Some(PathInfo { elements });
        self
    }

    /// Drop the direct parent id, leaving only the path (if any).
    pub fn without_parent_id(mut self) -> Self {
        self.parent_id = None;
        self
    }

    /// Grant permissions on this entry.
    pub fn with_allowable_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.allowable_operations = operations.into_iter().map(Into::into).collect();
        self
    }

    /// The id to address this node with.
    ///
    /// Shared-file entries carry the real node id in `node_id`; it wins over
    /// `id` when present. Empty ids count as missing.
    pub fn resolved_id(&self) -> Option<&NodeId> {
        self.node_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(&self.id).filter(|id| !id.is_empty()))
    }

    /// The parent id, from `parent_id` or else the last path element.
    pub fn parent_ref(&self) -> Option<&NodeId> {
        self.parent_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.path.as_ref().and_then(PathInfo::parent).map(|p| &p.id))
    }

    /// Whether this entry is a folder or plain content.
    pub fn kind(&self) -> ContentKind {
        if self.is_folder {
            ContentKind::Folder
        } else {
            ContentKind::Content
        }
    }

    /// Check if `operation` is listed in the entry's allowable operations.
    pub fn allows(&self, operation: &str) -> bool {
        self.allowable_operations.iter().any(|op| op == operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_id_prefers_shared_node_id() {
        let entry = NodeEntry::file("share-1", "a.txt", "parent").with_node_id("node-1");
        assert_eq!(entry.resolved_id(), Some(&NodeId::new("node-1")));

        let entry = NodeEntry::file("node-2", "a.txt", "parent").with_node_id("");
        assert_eq!(entry.resolved_id(), Some(&NodeId::new("node-2")));

        assert_eq!(NodeEntry::default().resolved_id(), None);
    }

    #[test]
    fn test_parent_ref_falls_back_to_path() {
        let entry = NodeEntry::folder("f", "docs", "p1");
        assert_eq!(entry.parent_ref(), Some(&NodeId::new("p1")));

        let entry = NodeEntry::folder("f", "docs", "ignored")
            .without_parent_id()
            .with_path(vec![
                PathElement::new("root", "Company Home"),
                PathElement::new("p2", "Sites"),
            ]);
        assert_eq!(entry.parent_ref(), Some(&NodeId::new("p2")));

        let entry = NodeEntry::folder("f", "docs", "x")
            .without_parent_id()
            .with_path(vec![]);
        assert_eq!(entry.parent_ref(), None);
    }

    #[test]
    fn test_entry_deserializes_from_repository_json() {
        let json = r#"{
            "id": "n1",
            "name": "report.pdf",
            "isFile": true,
            "path": { "elements": [{ "id": "root", "name": "Company Home" }] },
            "allowableOperations": ["delete", "update"]
        }"#;
        let entry: NodeEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.kind(), ContentKind::Content);
        assert_eq!(entry.parent_ref(), Some(&NodeId::new("root")));
        assert!(entry.allows("update"));
        assert!(!entry.allows("create"));
    }
}
