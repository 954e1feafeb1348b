//! Destination folder selection.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use nodeactions_core::{ActionConfig, ActionError, ContentAction, NodeEntry, NodeId};

use crate::api::PermissionOracle;

type RowFilter = Arc<dyn Fn(&NodeEntry) -> bool + Send + Sync>;
type ImageResolver = Arc<dyn Fn(&NodeEntry) -> Option<String> + Send + Sync>;

/// What the orchestrator asks a [`DestinationPicker`] to show.
#[derive(Clone)]
pub struct SelectionRequest {
    /// The action the destination is picked for.
    pub action: ContentAction,
    /// Dialog title, e.g. `"copy report.pdf to ..."`.
    pub title: String,
    /// Folder the picker should open in.
    pub current_folder_id: NodeId,
    row_filter: RowFilter,
    image_resolver: ImageResolver,
}

impl SelectionRequest {
    /// Build the request for a batch over `entries`.
    ///
    /// `entries` must be non-empty; the orchestrator validates this first.
    pub(crate) fn for_batch(
        action: ContentAction,
        entries: &[NodeEntry],
        config: &ActionConfig,
        permissions: Arc<dyn PermissionOracle>,
    ) -> Self {
        let update_permission = config.update_permission.clone();
        let disabled_icon = config.disabled_folder_icon.clone();

        Self {
            action,
            title: selection_title(action, entries),
            current_folder_id: first_parent_id(entries).unwrap_or_default(),
            row_filter: Arc::new(|row: &NodeEntry| !row.is_file),
            image_resolver: Arc::new(move |row: &NodeEntry| {
                (!permissions.has_permission(row, &update_permission)).then(|| disabled_icon.clone())
            }),
        }
    }

    /// Whether `row` may be offered as a destination. Files never are.
    pub fn accepts(&self, row: &NodeEntry) -> bool {
        (self.row_filter)(row)
    }

    /// Icon overriding the default for `row`, if any.
    pub fn icon_for(&self, row: &NodeEntry) -> Option<String> {
        (self.image_resolver)(row)
    }
}

impl fmt::Debug for SelectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionRequest")
            .field("action", &self.action)
            .field("title", &self.title)
            .field("current_folder_id", &self.current_folder_id)
            .finish_non_exhaustive()
    }
}

/// Title of the picker dialog; names the entry when exactly one is selected.
fn selection_title(action: ContentAction, entries: &[NodeEntry]) -> String {
    match entries {
        [single] if !single.name.is_empty() => format!("{action} {} to ...", single.name),
        _ => format!("{action} to ..."),
    }
}

/// The first parent id found among `entries`, else the first entry's own id.
pub(crate) fn first_parent_id(entries: &[NodeEntry]) -> Option<NodeId> {
    entries
        .iter()
        .find_map(NodeEntry::parent_ref)
        .or_else(|| entries.first().and_then(NodeEntry::resolved_id))
        .cloned()
}

/// Lets the user choose the destination folder of a batch.
#[async_trait]
pub trait DestinationPicker: Send + Sync {
    /// Show the picker and wait for the chosen folders.
    ///
    /// Only the first returned folder is used. An empty selection means the
    /// user picked nothing.
    async fn select(&self, request: SelectionRequest) -> Result<Vec<NodeEntry>, ActionError>;

    /// Close any picker still open.
    fn close_all(&self);
}

/// Picker that always answers with one preconfigured folder.
#[derive(Debug, Clone)]
pub struct FixedDestination {
    destination: NodeEntry,
}

impl FixedDestination {
    pub fn new(folder_id: impl Into<NodeId>) -> Self {
        Self {
            destination: NodeEntry {
                id: folder_id.into(),
                is_folder: true,
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl DestinationPicker for FixedDestination {
    async fn select(&self, request: SelectionRequest) -> Result<Vec<NodeEntry>, ActionError> {
        tracing::debug!(title = %request.title, destination = %self.destination.id, "Destination preselected");

        if request.accepts(&self.destination) {
            Ok(vec![self.destination.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    fn close_all(&self) {}
}
