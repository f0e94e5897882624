//! Theme data model.
//!
//! A [`Theme`] is what a package's `theme_config.json` deserializes into. Every
//! override-bearing field is optional so that a missing value falls through to
//! the next layer during resolution (see [`crate::overrides`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// --- ThemeId ---
/// Stable, filesystem-safe theme identifier. Doubles as the package directory name.
///
/// Valid ids are non-empty, consist of ASCII alphanumerics, `-`, `_` or `.`,
/// and do not start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    /// Wraps `id` as-is. Use [`ThemeId::sanitize`] for untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn is_filesystem_safe(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && self.0.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    /// Maps every disallowed character to `_` and strips leading dots.
    /// Returns `None` if nothing usable remains.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let mapped: String = raw
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        let trimmed = mapped.trim_start_matches('.');
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// A fresh id for packages whose manifest does not declare one.
    pub fn generate() -> Self {
        Self(format!("theme_{}", Uuid::new_v4().simple()))
    }

    /// Derives an id from a display name: a slug plus a short random suffix.
    pub fn from_name(name: &str) -> Self {
        let slug: String = name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        let suffix = Uuid::new_v4().simple().to_string();
        if slug.is_empty() {
            Self(format!("theme_{}", &suffix[..8]))
        } else {
            Self(format!("{}-{}", slug, &suffix[..8]))
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ThemeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// --- Metadata ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeMetadata {
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    /// Resource reference of a custom theme icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Edit-lock: the in-app editor refuses to modify locked themes.
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
}

impl Default for ThemeMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            version: "1.0".to_string(),
            description: String::new(),
            icon: None,
            locked: false,
            share_link: None,
        }
    }
}

// --- Modules ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionModule {
    pub style: String,
    pub show_labels: bool,
    pub max_actions: u8,
}

impl Default for ActionModule {
    fn default() -> Self {
        Self { style: "pill".to_string(), show_labels: true, max_actions: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressModule {
    pub style: String,
    pub show_percentage: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_color: Option<String>,
}

impl Default for ProgressModule {
    fn default() -> Self {
        Self { style: "ring".to_string(), show_percentage: true, bar_color: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationModule {
    pub style: String,
    pub show_eta: bool,
    pub show_distance: bool,
}

impl Default for NavigationModule {
    fn default() -> Self {
        Self { style: "compact".to_string(), show_eta: true, show_distance: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallModule {
    pub style: String,
    pub show_timer: bool,
}

impl Default for CallModule {
    fn default() -> Self {
        Self { style: "standard".to_string(), show_timer: true }
    }
}

/// Per-action styling, keyed by action title in [`AppThemeOverride::actions`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint_color: Option<String>,
}

// --- GlobalConfig ---
/// Theme-wide defaults. Unset values fall back to the baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_padding_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_app_colors: Option<bool>,
}

// --- AppThemeOverride ---
/// Per-package (or per-rule) overrides. `None` inherits from the next layer down.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppThemeOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_app_colors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_padding_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_module: Option<CallModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, ActionOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_module: Option<ProgressModule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_module: Option<NavigationModule>,
}

// --- Rules ---
/// Rule guards. Unset or empty fields are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConditions {
    /// Case-insensitive regex that must match the whole package id, not a
    /// substring of it: `music` does not match `com.app.music`, `.*music` does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Case-insensitive regex searched in the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_regex: Option<String>,
    /// Case-insensitive regex searched in the body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_regex: Option<String>,
    /// Reserved. A rule carrying this condition never matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_state_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Higher values are evaluated first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub conditions: RuleConditions,
    /// Layout tag that replaces the classifier's decision, e.g. `"MEDIA"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_layout: Option<String>,
    #[serde(default, rename = "override", skip_serializing_if = "Option::is_none")]
    pub theme_override: Option<AppThemeOverride>,
}

impl Rule {
    pub fn new(id: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            comment: None,
            priority,
            conditions: RuleConditions::default(),
            target_layout: None,
            theme_override: None,
        }
    }
}

// --- Theme ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub id: ThemeId,
    #[serde(default)]
    pub meta: ThemeMetadata,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_actions: Option<ActionModule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_progress: Option<ProgressModule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_navigation: Option<NavigationModule>,
    /// Per-package overrides keyed by package id.
    #[serde(default)]
    pub apps: BTreeMap<String, AppThemeOverride>,
    /// Declaration order matters: it breaks priority ties.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Theme {
    /// A blank theme for in-app authoring, with an id derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ThemeId::from_name(&name),
            meta: ThemeMetadata { name, ..ThemeMetadata::default() },
            global: GlobalConfig::default(),
            default_actions: None,
            default_progress: None,
            default_navigation: None,
            apps: BTreeMap::new(),
            rules: Vec::new(),
        }
    }

    /// Rules in evaluation order: descending priority, ties in declaration order.
    pub fn sorted_rules(&self) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self.rules.iter().collect();
        // sort_by is stable
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        rules
    }

    pub fn app_override(&self, package: &str) -> Option<&AppThemeOverride> {
        self.apps.get(package)
    }
}
