//! Override resolution.
//!
//! Computes the [`ResolvedOverride`] for one event by folding, field by
//! field, the matched rule's payload over the active theme's per-package
//! override, the theme globals, and finally the baseline. Resolution is pure:
//! it reads the theme snapshot it is given and nothing else.

pub mod layer;
pub mod resolved;

pub use layer::OverrideLayer;
pub use resolved::ResolvedOverride;

use crate::theming::{AppThemeOverride, Theme};

/// Resolves visual properties for `package`.
///
/// Precedence per field: `rule_override`, then the theme's override for
/// `package`, then the theme's globals and default modules, then the baseline.
pub fn resolve(package: &str, rule_override: Option<&AppThemeOverride>, theme: Option<&Theme>) -> ResolvedOverride {
    let layers = [
        rule_override.map(OverrideLayer::from_app),
        theme.and_then(|t| t.app_override(package)).map(OverrideLayer::from_app),
        theme.map(OverrideLayer::from_theme),
    ];
    layers
        .into_iter()
        .flatten()
        .fold(OverrideLayer::default(), OverrideLayer::over)
        .finish()
}
