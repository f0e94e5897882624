use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::classifier::IslandKind;
use crate::events::{NotificationEvent, WidgetUpdateEvent};

/// Layout tag of widget-origin islands.
pub const WIDGET_LAYOUT: &str = "WIDGET";

/// What a translator hands to delivery: structured fields plus a serialized
/// parameter blob. The pipeline never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandPayload {
    pub layout: String,
    pub fields: BTreeMap<String, Value>,
    pub params: String,
}

impl IslandPayload {
    pub fn new(layout: impl Into<String>) -> Self {
        Self { layout: layout.into(), fields: BTreeMap::new(), params: String::new() }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// The raw event a payload is built from.
#[derive(Debug, Clone, Copy)]
pub enum IslandSource<'a> {
    Notification { event: &'a NotificationEvent, kind: &'a IslandKind },
    Widget(&'a WidgetUpdateEvent),
}

impl IslandSource<'_> {
    pub fn layout(&self) -> &str {
        match self {
            IslandSource::Notification { kind, .. } => kind.tag(),
            IslandSource::Widget(_) => WIDGET_LAYOUT,
        }
    }
}
