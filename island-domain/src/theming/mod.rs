//! Theme packages, storage and the active theme slot.
//!
//! Themes are installed from zip packages, authored in-app through
//! [`ThemeStore::save`], and activated into [`ActiveTheme`], which the event
//! pipeline reads without locking.

pub mod active;
pub mod assets;
pub mod errors;
pub mod events;
pub mod package;
pub mod store;
pub mod types;

pub use active::ActiveTheme;
pub use assets::{ContentResolver, FileContentResolver, ResourceRef};
pub use errors::{AssetResolutionError, InvalidPackageReason, ThemeStoreError};
pub use events::ThemeStoreEvent;
pub use package::MANIFEST_FILE;
pub use store::{FileThemeStore, ThemeStore};
pub use types::{
    ActionModule, ActionOverride, AppThemeOverride, CallModule, GlobalConfig, NavigationModule, ProgressModule,
    Rule, RuleConditions, Theme, ThemeId, ThemeMetadata,
};
