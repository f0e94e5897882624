//! Shared cache of compiled rule patterns.
//!
//! Keyed by pattern string. A pattern that fails to compile is cached as a
//! negative entry, so its failure is logged exactly once and later lookups
//! are cheap misses.

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::errors::RuleError;

#[derive(Debug, Default)]
pub struct RegexCache {
    entries: RwLock<HashMap<String, Option<Arc<Regex>>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` case-insensitively.
    pub fn compile(pattern: &str) -> Result<Regex, RuleError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::InvalidRegex { pattern: pattern.to_string(), source })
    }

    /// Compiled regex for a substring search, or `None` if it does not compile.
    pub fn search(&self, pattern: &str) -> Option<Arc<Regex>> {
        self.get_or_compile(pattern)
    }

    /// Compiled regex that must match the whole haystack.
    pub fn full_match(&self, pattern: &str) -> Option<Arc<Regex>> {
        self.get_or_compile(&format!("^(?:{})$", pattern))
    }

    fn get_or_compile(&self, pattern: &str) -> Option<Arc<Regex>> {
        if let Some(entry) = self.entries.read().get(pattern) {
            return entry.clone();
        }
        let mut entries = self.entries.write();
        // Another thread may have compiled it between the two locks.
        if let Some(entry) = entries.get(pattern) {
            return entry.clone();
        }
        let compiled = match Self::compile(pattern) {
            Ok(regex) => Some(Arc::new(regex)),
            Err(e) => {
                warn!("{}; condition will never match", e);
                None
            }
        };
        entries.insert(pattern.to_string(), compiled.clone());
        compiled
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of cached patterns that failed to compile.
    pub fn failed_count(&self) -> usize {
        self.entries.read().values().filter(|entry| entry.is_none()).count()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
