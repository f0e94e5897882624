//! Per-key rate limiting for island updates.
//!
//! Two independent limiters guard the two producers:
//!
//! - [`NotificationThrottle`]: a fixed window per notification key. Inside the
//!   window, progress-bearing updates whose title and text are unchanged are
//!   dropped; every other update passes.
//! - [`WidgetThrottle`]: a window per widget id sized by render mode. Forced
//!   updates always pass.
//!
//! Dropped updates are never queued. Time comes from an injectable [`Clock`].

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

use island_core::config::IslandConfig;

use crate::events::{NotificationEvent, RenderMode, WidgetUpdateEvent};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), elapsed: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Pass,
    Suppress,
}

impl ThrottleDecision {
    pub fn passes(self) -> bool {
        self == ThrottleDecision::Pass
    }
}

#[derive(Debug)]
struct NotificationEntry {
    accepted_at: Instant,
    title: String,
    text: String,
}

#[derive(Debug)]
pub struct NotificationThrottle {
    window: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, NotificationEntry>>,
}

impl NotificationThrottle {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { window, clock, entries: Mutex::new(HashMap::new()) }
    }

    pub fn from_config(config: &IslandConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(Duration::from_millis(config.notification_throttle_ms), clock)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decides whether `event` may be delivered and records it if so.
    pub fn check(&self, event: &NotificationEvent) -> ThrottleDecision {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(&event.key) {
            let within_window = now.saturating_duration_since(entry.accepted_at) < self.window;
            let content_changed = entry.title != event.title || entry.text != event.text;
            if within_window && event.is_progress_bearing() && !content_changed {
                trace!(key = %event.key, "Progress update inside throttle window dropped");
                return ThrottleDecision::Suppress;
            }
        }
        entries.insert(
            event.key.clone(),
            NotificationEntry { accepted_at: now, title: event.title.clone(), text: event.text.clone() },
        );
        ThrottleDecision::Pass
    }

    pub fn forget(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn tracked(&self) -> usize {
        self.entries.lock().len()
    }
}

#[derive(Debug)]
pub struct WidgetThrottle {
    snapshot_window: Duration,
    interactive_window: Duration,
    clock: Arc<dyn Clock>,
    last_accepted: Mutex<HashMap<i32, Instant>>,
}

impl WidgetThrottle {
    pub fn new(snapshot_window: Duration, interactive_window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { snapshot_window, interactive_window, clock, last_accepted: Mutex::new(HashMap::new()) }
    }

    pub fn from_config(config: &IslandConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Duration::from_millis(config.widget_snapshot_throttle_ms),
            Duration::from_millis(config.widget_interactive_throttle_ms),
            clock,
        )
    }

    pub fn window_for(&self, mode: RenderMode) -> Duration {
        match mode {
            RenderMode::Snapshot => self.snapshot_window,
            RenderMode::Interactive => self.interactive_window,
        }
    }

    pub fn check(&self, event: &WidgetUpdateEvent) -> ThrottleDecision {
        let now = self.clock.now();
        let mut last_accepted = self.last_accepted.lock();
        if !event.forced {
            if let Some(at) = last_accepted.get(&event.widget_id) {
                if now.saturating_duration_since(*at) < self.window_for(event.render_mode) {
                    trace!(widget_id = event.widget_id, mode = %event.render_mode, "Widget update inside throttle window dropped");
                    return ThrottleDecision::Suppress;
                }
            }
        }
        last_accepted.insert(event.widget_id, now);
        ThrottleDecision::Pass
    }

    pub fn forget(&self, widget_id: i32) -> bool {
        self.last_accepted.lock().remove(&widget_id).is_some()
    }

    pub fn tracked(&self) -> usize {
        self.last_accepted.lock().len()
    }
}
