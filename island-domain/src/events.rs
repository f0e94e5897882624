//! Inbound event snapshots.
//!
//! Both producers (the notification source and the widget-render source) hand
//! the pipeline immutable snapshots. The pipeline never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Notification category that marks turn-by-turn navigation.
pub const CATEGORY_NAVIGATION: &str = "navigation";

/// Snapshot of a posted OS notification, taken at arrival time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Stable identifier tying successive updates to one logical notification.
    pub key: String,
    pub package: String,
    pub title: String,
    pub text: String,
    /// Expanded text, used as the rule-matching body when present.
    #[serde(default)]
    pub big_text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub progress_max: i32,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub progress_indeterminate: bool,
    #[serde(default)]
    pub uses_chronometer: bool,
    /// Chronometer base in epoch milliseconds; only meaningful when positive.
    #[serde(default)]
    pub chronometer_base: i64,
    /// Opaque handle of the content-click action.
    #[serde(default)]
    pub content_intent: Option<String>,
}

impl NotificationEvent {
    pub fn new(key: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            package: package.into(),
            title: String::new(),
            text: String::new(),
            big_text: None,
            category: None,
            progress_max: 0,
            progress: 0,
            progress_indeterminate: false,
            uses_chronometer: false,
            chronometer_base: 0,
            content_intent: None,
        }
    }

    pub fn with_content(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.title = title.into();
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_progress(mut self, progress: i32, max: i32) -> Self {
        self.progress = progress;
        self.progress_max = max;
        self
    }

    pub fn with_indeterminate_progress(mut self) -> Self {
        self.progress_indeterminate = true;
        self
    }

    pub fn with_chronometer(mut self, base: i64) -> Self {
        self.uses_chronometer = true;
        self.chronometer_base = base;
        self
    }

    /// `true` when the update carries a determinate progress value.
    pub fn is_progress_bearing(&self) -> bool {
        self.progress_max > 0
    }

    /// Text used as the rule-matching body.
    pub fn candidate_text(&self) -> &str {
        match &self.big_text {
            Some(big) if !big.is_empty() => big,
            _ => &self.text,
        }
    }
}

/// How a widget surface was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderMode {
    /// Live views with their own click handling.
    Interactive,
    /// A bitmap re-render of the widget.
    Snapshot,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Interactive => write!(f, "INTERACTIVE"),
            RenderMode::Snapshot => write!(f, "SNAPSHOT"),
        }
    }
}

/// Opaque rendered widget content. Cloning shares the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedSurface(Arc<[u8]>);

impl RenderedSurface {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A widget render delivered by the widget host.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetUpdateEvent {
    pub widget_id: i32,
    pub render_mode: RenderMode,
    pub surface: RenderedSurface,
    /// Package of the widget provider, when the host knows it.
    pub provider_package: Option<String>,
    /// Manual/test trigger; bypasses throttling.
    pub forced: bool,
}

impl WidgetUpdateEvent {
    pub fn new(widget_id: i32, render_mode: RenderMode, surface: RenderedSurface) -> Self {
        Self {
            widget_id,
            render_mode,
            surface,
            provider_package: None,
            forced: false,
        }
    }

    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }

    pub fn with_provider(mut self, package: impl Into<String>) -> Self {
        self.provider_package = Some(package.into());
        self
    }

    /// Session key under which this widget's output is tracked.
    pub fn source_key(&self) -> String {
        widget_source_key(self.widget_id)
    }
}

/// Session key for a widget id. Prefixed so it can never collide with a
/// notification key.
pub fn widget_source_key(widget_id: i32) -> String {
    format!("widget:{}", widget_id)
}
