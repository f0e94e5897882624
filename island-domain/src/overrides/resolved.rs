use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::theming::{ActionModule, ActionOverride, CallModule, NavigationModule, ProgressModule};

pub const BASELINE_HIGHLIGHT_COLOR: &str = "#FFFFFF";
pub const BASELINE_BACKGROUND_COLOR: &str = "#000000";
pub const BASELINE_TEXT_COLOR: &str = "#FFFFFF";
pub const BASELINE_SHAPE_ID: &str = "circle";
pub const BASELINE_ICON_PADDING_PERCENT: u8 = 15;
pub const BASELINE_USE_APP_COLORS: bool = false;

/// Final visual properties for one island. Every field is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOverride {
    pub highlight_color: String,
    pub background_color: String,
    pub text_color: String,
    pub shape_id: String,
    pub icon_padding_percent: u8,
    pub use_app_colors: bool,
    pub action_module: ActionModule,
    pub progress_module: ProgressModule,
    pub navigation_module: NavigationModule,
    pub call_module: CallModule,
    /// Per-action styling keyed by action title; empty when no layer sets any.
    pub actions: BTreeMap<String, ActionOverride>,
}

impl Default for ResolvedOverride {
    /// The baseline used when no theme is active.
    fn default() -> Self {
        Self {
            highlight_color: BASELINE_HIGHLIGHT_COLOR.to_string(),
            background_color: BASELINE_BACKGROUND_COLOR.to_string(),
            text_color: BASELINE_TEXT_COLOR.to_string(),
            shape_id: BASELINE_SHAPE_ID.to_string(),
            icon_padding_percent: BASELINE_ICON_PADDING_PERCENT,
            use_app_colors: BASELINE_USE_APP_COLORS,
            action_module: ActionModule::default(),
            progress_module: ProgressModule::default(),
            navigation_module: NavigationModule::default(),
            call_module: CallModule::default(),
            actions: BTreeMap::new(),
        }
    }
}
