//! Override layers.
//!
//! Each source of visual properties (rule, app, theme globals) is viewed as
//! an [`OverrideLayer`] of borrowed optional fields. Layers merge
//! field-by-field, the upper layer winning wherever it is set, and the final
//! layer is completed from the baseline.

use std::collections::BTreeMap;

use crate::theming::{
    ActionModule, ActionOverride, AppThemeOverride, CallModule, NavigationModule, ProgressModule, Theme,
};

use super::resolved::ResolvedOverride;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverrideLayer<'a> {
    pub highlight_color: Option<&'a str>,
    pub background_color: Option<&'a str>,
    pub text_color: Option<&'a str>,
    pub shape_id: Option<&'a str>,
    pub icon_padding_percent: Option<u8>,
    pub use_app_colors: Option<bool>,
    pub action_module: Option<&'a ActionModule>,
    pub progress_module: Option<&'a ProgressModule>,
    pub navigation_module: Option<&'a NavigationModule>,
    pub call_module: Option<&'a CallModule>,
    pub actions: Option<&'a BTreeMap<String, ActionOverride>>,
}

impl<'a> OverrideLayer<'a> {
    /// Layer of a rule payload or a per-package override.
    pub fn from_app(app: &'a AppThemeOverride) -> Self {
        Self {
            highlight_color: non_blank(&app.highlight_color),
            background_color: None,
            text_color: None,
            shape_id: non_blank(&app.shape_id),
            icon_padding_percent: app.icon_padding_percent,
            use_app_colors: app.use_app_colors,
            action_module: None,
            progress_module: app.progress_module.as_ref(),
            navigation_module: app.navigation_module.as_ref(),
            call_module: app.call_module.as_ref(),
            actions: app.actions.as_ref().filter(|actions| !actions.is_empty()),
        }
    }

    /// Theme-wide layer: global colors plus the theme's default modules.
    pub fn from_theme(theme: &'a Theme) -> Self {
        let global = &theme.global;
        Self {
            highlight_color: non_blank(&global.highlight_color),
            background_color: non_blank(&global.background_color),
            text_color: non_blank(&global.text_color),
            shape_id: non_blank(&global.shape_id),
            icon_padding_percent: global.icon_padding_percent,
            use_app_colors: global.use_app_colors,
            action_module: theme.default_actions.as_ref(),
            progress_module: theme.default_progress.as_ref(),
            navigation_module: theme.default_navigation.as_ref(),
            call_module: None,
            actions: None,
        }
    }

    /// Fills every unset field of `self` from `lower`.
    pub fn over(self, lower: OverrideLayer<'a>) -> Self {
        Self {
            highlight_color: self.highlight_color.or(lower.highlight_color),
            background_color: self.background_color.or(lower.background_color),
            text_color: self.text_color.or(lower.text_color),
            shape_id: self.shape_id.or(lower.shape_id),
            icon_padding_percent: self.icon_padding_percent.or(lower.icon_padding_percent),
            use_app_colors: self.use_app_colors.or(lower.use_app_colors),
            action_module: self.action_module.or(lower.action_module),
            progress_module: self.progress_module.or(lower.progress_module),
            navigation_module: self.navigation_module.or(lower.navigation_module),
            call_module: self.call_module.or(lower.call_module),
            actions: self.actions.or(lower.actions),
        }
    }

    /// Completes the layer from the baseline.
    pub fn finish(self) -> ResolvedOverride {
        let base = ResolvedOverride::default();
        ResolvedOverride {
            highlight_color: self.highlight_color.map_or(base.highlight_color, str::to_string),
            background_color: self.background_color.map_or(base.background_color, str::to_string),
            text_color: self.text_color.map_or(base.text_color, str::to_string),
            shape_id: self.shape_id.map_or(base.shape_id, str::to_string),
            icon_padding_percent: self.icon_padding_percent.unwrap_or(base.icon_padding_percent),
            use_app_colors: self.use_app_colors.unwrap_or(base.use_app_colors),
            action_module: self.action_module.cloned().unwrap_or(base.action_module),
            progress_module: self.progress_module.cloned().unwrap_or(base.progress_module),
            navigation_module: self.navigation_module.cloned().unwrap_or(base.navigation_module),
            call_module: self.call_module.cloned().unwrap_or(base.call_module),
            actions: self.actions.cloned().unwrap_or(base.actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_layer_wins_per_field() {
        let upper = OverrideLayer { highlight_color: Some("#111111"), ..Default::default() };
        let lower = OverrideLayer {
            highlight_color: Some("#222222"),
            shape_id: Some("square"),
            ..Default::default()
        };
        let merged = upper.over(lower);
        assert_eq!(merged.highlight_color, Some("#111111"));
        assert_eq!(merged.shape_id, Some("square"));
        assert_eq!(merged.text_color, None);
    }

    #[test]
    fn blank_strings_and_empty_action_maps_are_unset() {
        let app = AppThemeOverride {
            highlight_color: Some(String::new()),
            shape_id: Some("  ".to_string()),
            actions: Some(BTreeMap::new()),
            ..Default::default()
        };
        assert_eq!(OverrideLayer::from_app(&app), OverrideLayer::default());
    }

    #[test]
    fn empty_layer_finishes_as_baseline() {
        assert_eq!(OverrideLayer::default().finish(), ResolvedOverride::default());
    }
}
