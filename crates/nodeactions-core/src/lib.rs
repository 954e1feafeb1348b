//! Core types for nodeactions.
//!
//! This crate provides the data model shared by the batch copy/move
//! orchestrator: content nodes as returned by a content repository, paged
//! child listings, the action being performed, errors and configuration.

mod action;
mod config;
mod error;
mod node;
mod paging;

pub use action::{ContentAction, ContentKind};
pub use config::{ActionConfig, ActionConfigBuilder, ActionConfigBuilderError};
pub use error::ActionError;
pub use node::{NodeEntry, NodeId, PathElement, PathInfo};
pub use paging::{NodePaging, Pagination};
