//! Paged child listings.

use serde::{Deserialize, Serialize};

use crate::node::NodeEntry;

/// Pagination info returned alongside a page of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of entries in this page.
    pub count: usize,
    /// Whether further pages exist after this one.
    pub has_more_items: bool,
    /// Total number of entries across all pages, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
    /// Offset of this page.
    pub skip_count: usize,
    /// Requested page size.
    pub max_items: usize,
}

/// One page of a child listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePaging {
    pub entries: Vec<NodeEntry>,
    pub pagination: Pagination,
}

impl NodePaging {
    /// Build the page `[skip_count, skip_count + max_items)` out of a full listing.
    pub fn slice(all: &[NodeEntry], skip_count: usize, max_items: usize) -> Self {
        let entries: Vec<NodeEntry> = all
            .iter()
            .skip(skip_count)
            .take(max_items)
            .cloned()
            .collect();

        Self {
            pagination: Pagination {
                count: entries.len(),
                has_more_items: skip_count + entries.len() < all.len(),
                total_items: Some(all.len()),
                skip_count,
                max_items,
            },
            entries,
        }
    }

    /// Offset of the page following this one, if there is one.
    pub fn next_skip_count(&self) -> Option<usize> {
        (self.pagination.has_more_items && self.pagination.count > 0)
            .then(|| self.pagination.skip_count + self.pagination.count)
    }
}
