use serde::{Deserialize, Serialize};
use super::types::ThemeId;

/// Broadcast by the theme store after each successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeStoreEvent {
    Installed(ThemeId),
    Saved(ThemeId),
    Deleted(ThemeId),
    Activated(ThemeId),
    Deactivated,
}
