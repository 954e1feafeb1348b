//! Batch action types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The operation a batch performs on its entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentAction {
    Copy,
    Move,
}

impl ContentAction {
    /// Whether this action needs the caller's permission on every entry.
    pub fn requires_permission(self) -> bool {
        matches!(self, Self::Move)
    }
}

/// Coarse type of a content entry, as reported in batch status tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    /// Anything that is not a folder.
    Content,
    Folder,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_action_names() {
        let names: Vec<String> = ContentAction::iter().map(|a| a.to_string()).collect();
        assert_eq!(names, ["copy", "move"]);
        assert_eq!(ContentAction::from_str("move").unwrap(), ContentAction::Move);
        assert!(ContentAction::from_str("delete").is_err());
    }

    #[test]
    fn test_only_move_requires_permission() {
        assert!(!ContentAction::Copy.requires_permission());
        assert!(ContentAction::Move.requires_permission());
    }
}
