//! Rule matching.
//!
//! Rules of the active theme are evaluated in descending priority, ties in
//! declaration order; the first rule whose conditions all hold wins. Every
//! condition that is set must match, unset or empty ones are wildcards. The
//! package condition is checked before any title/body regex so that
//! non-matching packages never touch the text patterns.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::classifier::IslandKind;
use crate::events::NotificationEvent;
use crate::theming::{AppThemeOverride, Rule, Theme};

use super::regex_cache::RegexCache;

/// The winning rule and what it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule_id: String,
    /// Replaces the classifier's decision when set.
    pub target: Option<IslandKind>,
    pub theme_override: Option<AppThemeOverride>,
}

impl RuleMatch {
    fn from_rule(rule: &Rule) -> Self {
        Self {
            rule_id: rule.id.clone(),
            target: rule.target_layout.as_deref().and_then(IslandKind::from_tag),
            theme_override: rule.theme_override.clone(),
        }
    }
}

fn condition(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    regex_cache: Arc<RegexCache>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares `regex_cache` with other engines.
    pub fn with_cache(regex_cache: Arc<RegexCache>) -> Self {
        Self { regex_cache }
    }

    pub fn regex_cache(&self) -> &Arc<RegexCache> {
        &self.regex_cache
    }

    /// Finds the first rule of `theme` matching the event. `title` and `text`
    /// are the candidate strings the caller extracted from it.
    pub fn match_event(
        &self,
        event: &NotificationEvent,
        title: &str,
        text: &str,
        theme: Option<&Theme>,
    ) -> Option<RuleMatch> {
        let theme = theme?;
        if theme.rules.is_empty() {
            return None;
        }
        let matched = theme
            .sorted_rules()
            .into_iter()
            .find(|rule| self.rule_matches(rule, &event.package, title, text))
            .map(RuleMatch::from_rule);
        if let Some(m) = &matched {
            debug!(key = %event.key, rule_id = %m.rule_id, "Rule matched");
        }
        matched
    }

    fn rule_matches(&self, rule: &Rule, package: &str, title: &str, text: &str) -> bool {
        let conditions = &rule.conditions;
        if condition(&conditions.external_state_key).is_some() {
            trace!(rule_id = %rule.id, "External state conditions are not evaluated");
            return false;
        }
        if let Some(pattern) = condition(&conditions.package) {
            if !self.regex_cache.full_match(pattern).map_or(false, |re| re.is_match(package)) {
                return false;
            }
        }
        if let Some(pattern) = condition(&conditions.title_regex) {
            if !self.regex_cache.search(pattern).map_or(false, |re| re.is_match(title)) {
                return false;
            }
        }
        if let Some(pattern) = condition(&conditions.body_regex) {
            if !self.regex_cache.search(pattern).map_or(false, |re| re.is_match(text)) {
                return false;
            }
        }
        true
    }
}
