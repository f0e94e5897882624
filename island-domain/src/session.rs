//! Active session registry.
//!
//! Maps a source key (notification key or `widget:<id>`) to the output id of
//! the island currently posted for it. A key never owns more than one output;
//! later updates for a registered key reuse its id.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Identifier of one emitted island output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputId(Uuid);

impl OutputId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, OutputId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `output_id` for `key`, returning the id it replaced.
    pub fn register(&self, key: impl Into<String>, output_id: OutputId) -> Option<OutputId> {
        self.sessions.write().insert(key.into(), output_id)
    }

    pub fn lookup(&self, key: &str) -> Option<OutputId> {
        self.sessions.read().get(key).copied()
    }

    pub fn unregister(&self, key: &str) -> Option<OutputId> {
        self.sessions.write().remove(key)
    }

    /// Existing output id for `key`, or a fresh one registered atomically.
    /// The flag is `true` when the id was newly created.
    pub fn get_or_register(&self, key: &str) -> (OutputId, bool) {
        if let Some(id) = self.lookup(key) {
            return (id, false);
        }
        let mut sessions = self.sessions.write();
        match sessions.get(key) {
            Some(id) => (*id, false),
            None => {
                let id = OutputId::new_v4();
                sessions.insert(key.to_string(), id);
                (id, true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
