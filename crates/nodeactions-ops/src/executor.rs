//! Batch orchestration of copy and move actions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use nodeactions_core::{ActionConfig, ActionError, ContentAction, NodeEntry, NodeId};

use crate::api::{ContentApi, PermissionOracle};
use crate::context::{ActionContext, entry_id};
use crate::events::ActionEvents;
use crate::outcome::{NodeResult, OperationReport, Outcome, classify};
use crate::selection::{DestinationPicker, SelectionRequest};
use crate::status::OperationStatus;
use crate::OPERATION_CHANNEL_SIZE;

/// Everything known about a finished batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Status token for the batch.
    pub status: OperationStatus,
    /// Destination folder the entries were copied or moved into.
    pub destination: NodeId,
    /// One outcome per selected entry, in selection order.
    pub outcomes: Vec<Outcome>,
    /// The outcomes classified.
    pub report: OperationReport,
}

/// Copies and moves selected entries into a user-chosen folder.
///
/// Cloning is cheap and clones share the deleted-entries log.
#[derive(Clone)]
pub struct NodeActions {
    context: Arc<ActionContext>,
    permissions: Arc<dyn PermissionOracle>,
    picker: Arc<dyn DestinationPicker>,
    events: ActionEvents,
}

impl NodeActions {
    /// Create an orchestrator with the default configuration.
    pub fn new(
        api: Arc<dyn ContentApi>,
        permissions: Arc<dyn PermissionOracle>,
        picker: Arc<dyn DestinationPicker>,
        events: ActionEvents,
    ) -> Self {
        Self {
            context: Arc::new(ActionContext::new(api, ActionConfig::default())),
            permissions,
            picker,
            events,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ActionConfig) -> Self {
        self.context = Arc::new(ActionContext::new(self.context.api.clone(), config));
        self
    }

    /// The event channels results are published on.
    pub fn events(&self) -> &ActionEvents {
        &self.events
    }

    /// Folders the last move batch deleted from their original location.
    pub async fn deleted_entries(&self) -> Vec<NodeEntry> {
        self.context.deleted.lock().await.clone()
    }

    /// Copy `entries` into a folder chosen through the picker.
    pub fn copy_nodes(
        &self,
        entries: Vec<NodeEntry>,
        permission: Option<&str>,
    ) -> Result<mpsc::Receiver<Result<OperationStatus, ActionError>>, ActionError> {
        self.do_batch_operation(ContentAction::Copy, entries, permission)
    }

    /// Move `entries` into a folder chosen through the picker.
    pub fn move_nodes(
        &self,
        entries: Vec<NodeEntry>,
        permission: Option<&str>,
    ) -> Result<mpsc::Receiver<Result<OperationStatus, ActionError>>, ActionError> {
        self.do_batch_operation(ContentAction::Move, entries, permission)
    }

    /// Start a batch in the background.
    ///
    /// Validation and permission failures are returned immediately, before
    /// the picker is shown. Otherwise the returned receiver yields the
    /// batch status (or its error) once every entry has been processed.
    pub fn do_batch_operation(
        &self,
        action: ContentAction,
        entries: Vec<NodeEntry>,
        permission: Option<&str>,
    ) -> Result<mpsc::Receiver<Result<OperationStatus, ActionError>>, ActionError> {
        self.check_batch(action, &entries, permission)?;

        let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
        let this = self.clone();

        tokio::spawn(async move {
            let result = this.run_batch(action, &entries).await;
            let _ = tx.send(result.map(|batch| batch.status)).await;
        });

        Ok(rx)
    }

    /// Run a batch to completion and return its full report.
    pub async fn execute(
        &self,
        action: ContentAction,
        entries: &[NodeEntry],
        permission: Option<&str>,
    ) -> Result<BatchReport, ActionError> {
        self.check_batch(action, entries, permission)?;
        self.run_batch(action, entries).await
    }

    /// Reject batches that cannot run, without touching the repository.
    fn check_batch(
        &self,
        action: ContentAction,
        entries: &[NodeEntry],
        permission: Option<&str>,
    ) -> Result<(), ActionError> {
        validate_entries(entries)?;

        if action.requires_permission() {
            let denied = entries.iter().find(|entry| {
                !permission.is_some_and(|p| self.permissions.has_permission(entry, p))
            });
            if let Some(entry) = denied {
                return Err(ActionError::forbidden(format!(
                    "{action} '{}' needs permission '{}'",
                    entry.name,
                    permission.unwrap_or_default()
                )));
            }
        }

        Ok(())
    }

    async fn run_batch(
        &self,
        action: ContentAction,
        entries: &[NodeEntry],
    ) -> Result<BatchReport, ActionError> {
        let request = SelectionRequest::for_batch(
            action,
            entries,
            &self.context.config,
            self.permissions.clone(),
        );
        debug!(title = %request.title, folder = %request.current_folder_id, "Asking for destination");

        let result = match self.picker.select(request).await {
            Ok(selection) => match selection.first() {
                Some(destination) => match entry_id(destination) {
                    Ok(target) => self
                        .dispatch(action, entries, target)
                        .await
                        .map(|outcomes| (target.clone(), outcomes)),
                    Err(err) => Err(err),
                },
                None => Err(ActionError::NoDestination),
            },
            Err(err) => Err(err),
        };
        self.picker.close_all();

        let (destination, outcomes) = result.inspect_err(|err| {
            warn!(%action, error = %err, "Batch failed");
        })?;

        let status = OperationStatus::new(action, entries[0].kind());
        let report = classify(&outcomes);
        info!(%action, %destination, summary = %report.summary(), "Batch finished");

        match action {
            ContentAction::Copy => self.events.publish_copied(outcomes.clone()),
            ContentAction::Move => self.events.publish_moved(report.clone()),
        };

        Ok(BatchReport {
            status,
            destination,
            outcomes,
            report,
        })
    }

    /// Perform `action` on every entry and collect the outcomes.
    async fn dispatch(
        &self,
        action: ContentAction,
        entries: &[NodeEntry],
        target: &NodeId,
    ) -> Result<Vec<Outcome>, ActionError> {
        let context = &self.context;

        if let [entry] = entries {
            if action == ContentAction::Move && !entry.is_folder {
                let moved = context.api.move_node(entry_id(entry)?, target).await?;
                let result = NodeResult::moved(moved, entry.parent_ref().cloned());
                return Ok(vec![Outcome::Success(result)]);
            }
        }

        if action == ContentAction::Move {
            context.deleted.lock().await.clear();
        }

        context
            .try_each_entry(entries, |entry| match action {
                ContentAction::Copy => context.copy_node_action(entry, target),
                ContentAction::Move => context.move_node_action(entry, target),
            })
            .await
    }
}

/// Check that `entries` is non-empty and every entry has an id.
pub fn validate_entries(entries: &[NodeEntry]) -> Result<(), ActionError> {
    if entries.is_empty() {
        return Err(ActionError::bad_request("No entries selected"));
    }

    match entries.iter().position(|entry| entry.resolved_id().is_none()) {
        Some(index) => Err(ActionError::bad_request(format!(
            "Entry {index} has no id"
        ))),
        None => Ok(()),
    }
}
