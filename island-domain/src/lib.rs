//! # Island Domain Library (`island-domain`)
//!
//! The island theming pipeline. Inbound notification and widget events are
//! classified, matched against the active theme's rules, styled through the
//! override layers, rate limited and handed to an external renderer as island
//! payloads. Themes themselves are zip packages managed by the theme store.
//!
//! - [`theming`]: theme model, package codec, [`theming::FileThemeStore`] and
//!   the lock-free [`theming::ActiveTheme`] slot.
//! - [`rules`]: priority-ordered rule engine with a shared regex cache.
//! - [`overrides`]: rule > app > global > baseline resolution.
//! - [`classifier`]: navigation/timer/progress/standard classification.
//! - [`throttle`]: per-key rate limiting for both producers.
//! - [`session`]: source key to output id registry.
//! - [`pipeline`]: [`pipeline::IslandPipeline`] and its translator and
//!   delivery ports.

pub mod classifier;
pub mod error;
pub mod events;
pub mod overrides;
pub mod pipeline;
pub mod rules;
pub mod session;
pub mod theming;
pub mod throttle;

pub use classifier::{EventClassifier, IslandKind};
pub use error::{DomainError, DomainResult};
pub use events::{NotificationEvent, RenderMode, RenderedSurface, WidgetUpdateEvent};
pub use overrides::{resolve, ResolvedOverride};
pub use pipeline::{IslandDelivery, IslandPayload, IslandPipeline, IslandTranslator, Outcome, TranslatorRegistry};
pub use rules::{RegexCache, RuleEngine, RuleMatch};
pub use session::{OutputId, SessionRegistry};
pub use theming::{ActiveTheme, FileThemeStore, Theme, ThemeId, ThemeStore, ThemeStoreError, ThemeStoreEvent};
pub use throttle::{Clock, ManualClock, SystemClock};

use std::sync::Arc;
use tracing::info;

use island_core::config::IslandConfig;

/// The wired-up domain services.
pub struct IslandServices {
    pub store: Arc<FileThemeStore>,
    pub pipeline: Arc<IslandPipeline>,
}

/// Initialize the domain layer.
///
/// Builds the theme store and the pipeline around one shared [`ActiveTheme`]
/// and restores the configured startup theme. A startup theme that fails to
/// load leaves the pipeline on baseline styling.
pub async fn initialize(config: &IslandConfig, delivery: Arc<dyn IslandDelivery>) -> DomainResult<IslandServices> {
    let active = Arc::new(ActiveTheme::new());
    let store = Arc::new(FileThemeStore::from_config(config, active.clone())?);
    store.restore_active(config.active_theme.as_deref()).await;
    let pipeline = Arc::new(IslandPipeline::new(config, active, delivery));
    info!(themes_dir = ?store.themes_dir(), "Island domain initialized");
    Ok(IslandServices { store, pipeline })
}
