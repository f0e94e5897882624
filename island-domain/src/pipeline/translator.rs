//! Payload translators.
//!
//! A translator turns a classified event and its resolved style into an
//! [`IslandPayload`]. The [`TranslatorRegistry`] picks one per layout and
//! falls back to the standard translator for layouts nobody registered, so a
//! rule targeting an unknown layout still produces an island.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::classifier::IslandKind;
use crate::overrides::ResolvedOverride;

use super::errors::TranslationError;
use super::payload::{IslandPayload, IslandSource};

pub trait IslandTranslator: Send + Sync {
    fn translate(&self, source: IslandSource<'_>, style: &ResolvedOverride) -> Result<IslandPayload, TranslationError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IslandParams<'a> {
    layout: &'a str,
    style: &'a ResolvedOverride,
}

/// Generic translator: copies the event attributes relevant to its layout
/// into the payload fields and serializes the style as parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTranslator;

impl IslandTranslator for StandardTranslator {
    fn translate(&self, source: IslandSource<'_>, style: &ResolvedOverride) -> Result<IslandPayload, TranslationError> {
        let mut payload = IslandPayload::new(source.layout());
        let fields = &mut payload.fields;
        match source {
            IslandSource::Notification { event, kind } => {
                fields.insert("key".into(), json!(event.key));
                fields.insert("package".into(), json!(event.package));
                fields.insert("title".into(), json!(event.title));
                fields.insert("text".into(), json!(event.candidate_text()));
                match kind {
                    IslandKind::Timer => {
                        fields.insert("chronometerBase".into(), json!(event.chronometer_base));
                    }
                    IslandKind::Progress => {
                        fields.insert("progress".into(), json!(event.progress));
                        fields.insert("progressMax".into(), json!(event.progress_max));
                        fields.insert("indeterminate".into(), json!(event.progress_indeterminate));
                    }
                    _ => {}
                }
                if let Some(intent) = &event.content_intent {
                    fields.insert("contentIntent".into(), json!(intent));
                }
            }
            IslandSource::Widget(event) => {
                fields.insert("widgetId".into(), json!(event.widget_id));
                fields.insert("renderMode".into(), json!(event.render_mode));
                fields.insert("surfaceBytes".into(), json!(event.surface.len()));
                if let Some(provider) = &event.provider_package {
                    fields.insert("provider".into(), Value::String(provider.clone()));
                }
            }
        }
        payload.params = serde_json::to_string(&IslandParams { layout: &payload.layout, style })?;
        Ok(payload)
    }
}

#[derive(Clone)]
pub struct TranslatorRegistry {
    by_layout: HashMap<String, Arc<dyn IslandTranslator>>,
    fallback: Arc<dyn IslandTranslator>,
}

impl TranslatorRegistry {
    /// A registry where every layout uses [`StandardTranslator`].
    pub fn new() -> Self {
        Self { by_layout: HashMap::new(), fallback: Arc::new(StandardTranslator) }
    }

    pub fn register(&mut self, layout: impl Into<String>, translator: Arc<dyn IslandTranslator>) {
        self.by_layout.insert(layout.into(), translator);
    }

    pub fn with(mut self, layout: impl Into<String>, translator: Arc<dyn IslandTranslator>) -> Self {
        self.register(layout, translator);
        self
    }

    /// Translator for `layout`, then the one registered for the standard
    /// layout, then the built-in fallback.
    pub fn get(&self, layout: &str) -> &Arc<dyn IslandTranslator> {
        self.by_layout
            .get(layout)
            .or_else(|| self.by_layout.get(IslandKind::Standard.tag()))
            .unwrap_or(&self.fallback)
    }

    pub fn translate(&self, source: IslandSource<'_>, style: &ResolvedOverride) -> Result<IslandPayload, TranslationError> {
        self.get(source.layout()).translate(source, style)
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut layouts: Vec<&String> = self.by_layout.keys().collect();
        layouts.sort();
        f.debug_struct("TranslatorRegistry").field("layouts", &layouts).finish()
    }
}
