//! Batch copy/move orchestration for nodeactions.
//!
//! This crate drives copy and move operations on content-repository nodes:
//! it validates the selection, asks a [`DestinationPicker`] for a target
//! folder, runs the action on every entry (recursing into folders and
//! resolving name conflicts), classifies the aggregated [`Outcome`] and
//! publishes the results on [`ActionEvents`] broadcast channels.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nodeactions_ops::{
//!     ActionEvents, AllowableOperations, FixedDestination, InMemoryContentApi, NodeActions,
//! };
//! use nodeactions_core::NodeEntry;
//!
//! # async fn run() -> Result<(), nodeactions_core::ActionError> {
//! let api = Arc::new(InMemoryContentApi::new());
//! let actions = NodeActions::new(
//!     api,
//!     Arc::new(AllowableOperations),
//!     Arc::new(FixedDestination::new("archive")),
//!     ActionEvents::default(),
//! );
//!
//! let entries = vec![NodeEntry::file("n1", "report.pdf", "inbox")];
//! let mut status_rx = actions.copy_nodes(entries, None)?;
//! while let Some(status) = status_rx.recv().await {
//!     println!("{}", status?);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod conflict;
mod context;
mod copy;
mod events;
mod executor;
mod memory;
mod move_op;
mod outcome;
mod selection;
mod status;

pub use api::{AllowableOperations, ContentApi, PermissionOracle};
pub use conflict::next_available_name;
pub use events::{ActionEvents, EVENT_CHANNEL_SIZE};
pub use executor::{BatchReport, NodeActions, validate_entries};
pub use memory::{ApiCall, InMemoryContentApi, RepositorySnapshot, SnapshotError};
pub use outcome::{NodeResult, OperationReport, Outcome, classify};
pub use selection::{DestinationPicker, FixedDestination, SelectionRequest};
pub use status::OperationStatus;

/// Default channel buffer size for batch status updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
