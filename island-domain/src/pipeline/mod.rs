//! The island event pipeline.
//!
//! [`IslandPipeline`] ties the components together for each inbound event:
//!
//! 1. take a snapshot of the active theme,
//! 2. classify the event, then let the first matching rule retarget it,
//! 3. resolve the visual overrides,
//! 4. build the payload with the translator for the chosen layout,
//! 5. pass it through the rate limiter,
//! 6. reuse or register the source key's output id and emit.
//!
//! Failures of translation or delivery are logged and the event dropped;
//! nothing is retried or queued. A failed delivery also releases the key's
//! rate-limit slot. Removal bypasses rate limiting and clears
//! the key's limiter and session state immediately.

pub mod delivery;
pub mod errors;
pub mod payload;
pub mod translator;

pub use delivery::IslandDelivery;
pub use errors::{DeliveryError, TranslationError};
pub use payload::{IslandPayload, IslandSource, WIDGET_LAYOUT};
pub use translator::{IslandTranslator, StandardTranslator, TranslatorRegistry};

use std::sync::Arc;
use tracing::{debug, error, warn};

use island_core::config::IslandConfig;

use crate::classifier::EventClassifier;
use crate::events::{widget_source_key, NotificationEvent, WidgetUpdateEvent};
use crate::overrides;
use crate::rules::{RegexCache, RuleEngine};
use crate::session::{OutputId, SessionRegistry};
use crate::theming::ActiveTheme;
use crate::throttle::{Clock, NotificationThrottle, SystemClock, WidgetThrottle};

/// What happened to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emitted { output_id: OutputId, layout: String },
    /// Dropped by the rate limiter.
    Throttled,
    Cancelled { output_id: OutputId },
    /// Removal of a key with no live output.
    NotTracked,
    /// Translation or delivery failed; the event was dropped.
    Failed(String),
}

pub struct IslandPipeline {
    active: Arc<ActiveTheme>,
    classifier: EventClassifier,
    rules: RuleEngine,
    notification_throttle: NotificationThrottle,
    widget_throttle: WidgetThrottle,
    sessions: SessionRegistry,
    translators: TranslatorRegistry,
    delivery: Arc<dyn IslandDelivery>,
}

impl IslandPipeline {
    pub fn new(config: &IslandConfig, active: Arc<ActiveTheme>, delivery: Arc<dyn IslandDelivery>) -> Self {
        Self::with_clock(config, active, delivery, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &IslandConfig,
        active: Arc<ActiveTheme>,
        delivery: Arc<dyn IslandDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            active,
            classifier: EventClassifier::from_config(config),
            rules: RuleEngine::new(),
            notification_throttle: NotificationThrottle::from_config(config, clock.clone()),
            widget_throttle: WidgetThrottle::from_config(config, clock),
            sessions: SessionRegistry::new(),
            translators: TranslatorRegistry::new(),
            delivery,
        }
    }

    pub fn with_translators(mut self, translators: TranslatorRegistry) -> Self {
        self.translators = translators;
        self
    }

    /// Shares a compiled-pattern cache with other engines.
    pub fn with_regex_cache(mut self, cache: Arc<RegexCache>) -> Self {
        self.rules = RuleEngine::with_cache(cache);
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn regex_cache(&self) -> &Arc<RegexCache> {
        self.rules.regex_cache()
    }

    pub async fn on_notification_posted(&self, event: &NotificationEvent) -> Outcome {
        let theme = self.active.snapshot();
        let theme = theme.as_deref();

        let classified = self.classifier.classify(event);
        let matched = self.rules.match_event(event, &event.title, event.candidate_text(), theme);
        let (kind, rule_override) = match &matched {
            Some(m) => (m.target.clone().unwrap_or(classified), m.theme_override.as_ref()),
            None => (classified, None),
        };
        let style = overrides::resolve(&event.package, rule_override, theme);

        let payload = match self.translators.translate(IslandSource::Notification { event, kind: &kind }, &style) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %event.key, layout = %kind, "Failed to translate notification: {}", e);
                return Outcome::Failed(e.to_string());
            }
        };

        if !self.notification_throttle.check(event).passes() {
            return Outcome::Throttled;
        }
        let outcome = self.emit(&event.key, payload).await;
        if matches!(outcome, Outcome::Failed(_)) {
            // Nothing was shown; release the slot.
            self.notification_throttle.forget(&event.key);
        }
        outcome
    }

    pub async fn on_notification_removed(&self, key: &str) -> Outcome {
        self.notification_throttle.forget(key);
        self.cancel(key).await
    }

    pub async fn on_widget_update(&self, event: &WidgetUpdateEvent) -> Outcome {
        let theme = self.active.snapshot();
        let package = event.provider_package.as_deref().unwrap_or_default();
        let style = overrides::resolve(package, None, theme.as_deref());

        let key = event.source_key();
        let payload = match self.translators.translate(IslandSource::Widget(event), &style) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, "Failed to translate widget update: {}", e);
                return Outcome::Failed(e.to_string());
            }
        };

        if !self.widget_throttle.check(event).passes() {
            return Outcome::Throttled;
        }
        let outcome = self.emit(&key, payload).await;
        if matches!(outcome, Outcome::Failed(_)) {
            self.widget_throttle.forget(event.widget_id);
        }
        outcome
    }

    pub async fn on_widget_removed(&self, widget_id: i32) -> Outcome {
        self.widget_throttle.forget(widget_id);
        self.cancel(&widget_source_key(widget_id)).await
    }

    async fn emit(&self, key: &str, payload: IslandPayload) -> Outcome {
        let (output_id, created) = self.sessions.get_or_register(key);
        let layout = payload.layout.clone();
        match self.delivery.emit(key, output_id, payload).await {
            Ok(()) => {
                let reused = !created;
                debug!(key = %key, output_id = %output_id, layout = %layout, reused, "Island emitted");
                Outcome::Emitted { output_id, layout }
            }
            Err(e) => {
                error!(key = %key, output_id = %output_id, "Failed to emit island: {}", e);
                if created {
                    self.sessions.unregister(key);
                }
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn cancel(&self, key: &str) -> Outcome {
        let Some(output_id) = self.sessions.unregister(key) else {
            return Outcome::NotTracked;
        };
        if let Err(e) = self.delivery.cancel(key, output_id).await {
            error!(key = %key, output_id = %output_id, "Failed to cancel island: {}", e);
        }
        Outcome::Cancelled { output_id }
    }
}

impl std::fmt::Debug for IslandPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IslandPipeline")
            .field("active", &self.active.active_id())
            .field("sessions", &self.sessions.len())
            .field("translators", &self.translators)
            .finish()
    }
}
