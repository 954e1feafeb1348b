//! Typed results of copy/move actions and their classification.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use nodeactions_core::{ActionError, NodeEntry, NodeId};

/// A node successfully copied or moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResult {
    /// The node as returned by the repository after the action.
    pub entry: NodeEntry,
    /// Where the node lived before a move. Always `None` for copies.
    pub initial_parent_id: Option<NodeId>,
}

impl NodeResult {
    /// Result of a copy.
    pub fn copied(entry: NodeEntry) -> Self {
        Self {
            entry,
            initial_parent_id: None,
        }
    }

    /// Result of a move away from `initial_parent_id`.
    pub fn moved(entry: NodeEntry, initial_parent_id: Option<NodeId>) -> Self {
        Self {
            entry,
            initial_parent_id,
        }
    }
}

/// Outcome of an action on one entry.
///
/// Folders merged into an existing destination produce an `Aggregate` of
/// their children's outcomes, nested as deep as the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success(NodeResult),
    /// A file move refused because the name is taken at the destination.
    /// Any other failure aborts the batch instead.
    Failed(ActionError),
    Aggregate(Vec<Outcome>),
}

impl Outcome {
    /// Expand nested aggregates into their leaves, breadth first.
    ///
    /// Leaves directly inside an aggregate come before the leaves of its
    /// nested aggregates. A non-aggregate outcome flattens to itself.
    pub fn flatten(&self) -> Vec<&Outcome> {
        let Outcome::Aggregate(children) = self else {
            return vec![self];
        };

        let mut queue: VecDeque<&Outcome> = children.iter().collect();
        let mut leaves = Vec::new();
        while let Some(outcome) = queue.pop_front() {
            match outcome {
                Outcome::Aggregate(nested) => queue.extend(nested),
                leaf => leaves.push(leaf),
            }
        }
        leaves
    }

    /// Check if any leaf of this outcome failed.
    pub fn has_failure(&self) -> bool {
        self.flatten()
            .iter()
            .any(|leaf| matches!(leaf, Outcome::Failed(_)))
    }

    /// Check if any leaf of this outcome succeeded.
    pub fn has_success(&self) -> bool {
        self.flatten()
            .iter()
            .any(|leaf| matches!(leaf, Outcome::Success(_)))
    }

    /// Every error in this outcome, in flattened order.
    pub fn errors(&self) -> Vec<&ActionError> {
        self.flatten()
            .into_iter()
            .filter_map(|leaf| match leaf {
                Outcome::Failed(err) => Some(err),
                _ => None,
            })
            .collect()
    }
}

/// Outcomes of a batch, partitioned by how well each went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    pub succeeded: Vec<Outcome>,
    pub failed: Vec<Outcome>,
    pub partially_succeeded: Vec<Outcome>,
}

impl OperationReport {
    /// Check if every outcome succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.partially_succeeded.is_empty()
    }

    /// Total number of classified outcomes.
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.partially_succeeded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a human-readable summary of the report.
    pub fn summary(&self) -> String {
        match (self.partially_succeeded.len(), self.failed.len()) {
            (0, 0) => format!("{} succeeded", self.succeeded.len()),
            (0, failed) => format!("{} succeeded, {} failed", self.succeeded.len(), failed),
            (partial, failed) => format!(
                "{} succeeded, {} partially succeeded, {} failed",
                self.succeeded.len(),
                partial,
                failed
            ),
        }
    }
}

/// Partition outcomes into succeeded, failed and partially succeeded.
///
/// An aggregate without failures counts as succeeded (including an empty
/// one), with failures but no success as failed, and with both as
/// partially succeeded.
pub fn classify(outcomes: &[Outcome]) -> OperationReport {
    let mut report = OperationReport::default();

    for outcome in outcomes {
        let bucket = match outcome {
            Outcome::Success(_) => &mut report.succeeded,
            Outcome::Failed(_) => &mut report.failed,
            Outcome::Aggregate(_) if !outcome.has_failure() => &mut report.succeeded,
            Outcome::Aggregate(_) if !outcome.has_success() => &mut report.failed,
            Outcome::Aggregate(_) => &mut report.partially_succeeded,
        };
        bucket.push(outcome.clone());
    }

    report
}
