//! Action configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for batch copy/move operations.
///
/// Deserialization goes through [`ActionConfigBuilder`], so missing fields
/// take their defaults and zero limits are rejected either way.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    setter(into),
    derive(Deserialize),
    build_fn(validate = "Self::validate")
)]
#[serde(try_from = "ActionConfigBuilder")]
pub struct ActionConfig {
    /// Permission a destination folder needs to be offered as enabled.
    #[builder(default = "default_update_permission()")]
    pub update_permission: String,

    /// Icon shown for destination folders lacking the update permission.
    #[builder(default = "default_disabled_folder_icon()")]
    pub disabled_folder_icon: String,

    /// Page size used when listing children.
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: usize,

    /// Maximum number of renames tried for a conflicting copy.
    #[builder(default = "DEFAULT_MAX_RENAME_ATTEMPTS")]
    pub max_rename_attempts: usize,

    /// Maximum number of sibling requests in flight at once.
    #[builder(default = "DEFAULT_MAX_CONCURRENT_REQUESTS")]
    pub max_concurrent_requests: usize,
}

const DEFAULT_PAGE_SIZE: usize = 100;
const DEFAULT_MAX_RENAME_ATTEMPTS: usize = 100;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

fn default_update_permission() -> String {
    "update".to_string()
}

fn default_disabled_folder_icon() -> String {
    "disable/folder".to_string()
}

impl ActionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == Some(0) {
            return Err("Page size must be at least 1".to_string());
        }
        if self.max_rename_attempts == Some(0) {
            return Err("Rename attempts must be at least 1".to_string());
        }
        if self.max_concurrent_requests == Some(0) {
            return Err("Concurrent requests must be at least 1".to_string());
        }
        Ok(())
    }
}

impl TryFrom<ActionConfigBuilder> for ActionConfig {
    type Error = ActionConfigBuilderError;

    fn try_from(builder: ActionConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl ActionConfig {
    /// Create a new config builder.
    pub fn builder() -> ActionConfigBuilder {
        ActionConfigBuilder::default()
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            update_permission: default_update_permission(),
            disabled_folder_icon: default_disabled_folder_icon(),
            page_size: DEFAULT_PAGE_SIZE,
            max_rename_attempts: DEFAULT_MAX_RENAME_ATTEMPTS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}
