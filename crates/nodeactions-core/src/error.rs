//! Error types for content actions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status code used when a failure carries no status of its own.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Errors produced by the content repository or by the batch orchestrator.
///
/// Each variant maps onto an HTTP-style status code so repository errors and
/// locally detected precondition failures can be inspected the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ActionError {
    /// Malformed request, e.g. an entry list without resolvable ids.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The caller lacks the permission required for the action.
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    /// A referenced node does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A sibling with the same name already exists at the destination.
    #[error("Name conflict: {message}")]
    Conflict { message: String },

    /// Any other repository failure.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The destination picker returned no folder.
    #[error("No destination folder selected")]
    NoDestination,

    /// Conflict-driven renaming did not find a free name.
    #[error("No free name for '{name}' after {attempts} attempts")]
    RenameExhausted { name: String, attempts: usize },
}

impl ActionError {
    /// Build an error from a repository status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::BadRequest { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            status => Self::Server { status, message },
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a name conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a generic server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            status: SERVER_ERROR_STATUS,
            message: message.into(),
        }
    }

    /// The HTTP-style status code of this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } | Self::NoDestination => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } | Self::RenameExhausted { .. } => 409,
            Self::Server { status, .. } => *status,
        }
    }

    /// Check if this is a name conflict reported by the repository.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ActionError::from_status(409, "exists"),
            ActionError::Conflict { .. }
        ));
        assert!(matches!(
            ActionError::from_status(403, "nope"),
            ActionError::Forbidden { .. }
        ));

        let err = ActionError::from_status(502, "bad gateway");
        assert_eq!(err.status_code(), 502);
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ActionError::bad_request("x").status_code(), 400);
        assert_eq!(ActionError::NoDestination.status_code(), 400);
        assert_eq!(ActionError::server("x").status_code(), SERVER_ERROR_STATUS);
        assert!(ActionError::conflict("x").is_conflict());
        assert!(
            !ActionError::RenameExhausted {
                name: "a".into(),
                attempts: 3
            }
            .is_conflict()
        );
    }
}
