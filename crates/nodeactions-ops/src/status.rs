//! Status tokens emitted when a batch completes.

use std::fmt;

use serde::{Deserialize, Serialize};

use nodeactions_core::{ContentAction, ContentKind};

/// Completion status of a batch.
///
/// Displays as the translation key the UI looks up, e.g.
/// `OPERATION.SUCCES.FOLDER.MOVE`. The key is spelled as in the existing
/// translation bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// The action the batch performed.
    pub action: ContentAction,
    /// Kind of the first selected entry.
    pub kind: ContentKind,
}

impl OperationStatus {
    pub fn new(action: ContentAction, kind: ContentKind) -> Self {
        Self { action, kind }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind: &'static str = self.kind.into();
        let action: &'static str = self.action.into();
        write!(
            f,
            "OPERATION.SUCCES.{}.{}",
            kind.to_ascii_uppercase(),
            action.to_ascii_uppercase()
        )
    }
}
