//! Event classification.
//!
//! Decides which island layout a notification gets. Predicates are checked in
//! a fixed order and the first that holds wins; anything left over is
//! [`IslandKind::Standard`]. A matching rule's target layout replaces the
//! result afterwards (see [`IslandKind::from_tag`]).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use island_core::config::IslandConfig;

use crate::events::{NotificationEvent, CATEGORY_NAVIGATION};
use crate::rules::RegexCache;

/// Layout family of an island. Selects the translator that builds the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IslandKind {
    Navigation,
    Timer,
    Progress,
    Standard,
    /// A layout named by a rule's target tag that has no built-in meaning,
    /// e.g. `"MEDIA"`.
    Custom(String),
}

impl IslandKind {
    /// Parses a rule target-layout tag. Built-in names match
    /// case-insensitively; blank tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        let kind = match tag.to_ascii_uppercase().as_str() {
            "NAVIGATION" => IslandKind::Navigation,
            "TIMER" => IslandKind::Timer,
            "PROGRESS" => IslandKind::Progress,
            "STANDARD" => IslandKind::Standard,
            _ => IslandKind::Custom(tag.to_string()),
        };
        Some(kind)
    }

    pub fn tag(&self) -> &str {
        match self {
            IslandKind::Navigation => "NAVIGATION",
            IslandKind::Timer => "TIMER",
            IslandKind::Progress => "PROGRESS",
            IslandKind::Standard => "STANDARD",
            IslandKind::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for IslandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

type Predicate = fn(&EventClassifier, &NotificationEvent) -> bool;

#[derive(Debug, Clone)]
pub struct EventClassifier {
    navigation_packages: Vec<Regex>,
}

impl EventClassifier {
    /// Builds a classifier recognising the given navigation package patterns.
    /// Patterns that fail to compile are logged and ignored.
    pub fn new<I, S>(navigation_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let navigation_packages = navigation_patterns
            .into_iter()
            .filter_map(|pattern| match RegexCache::compile(pattern.as_ref()) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Ignoring navigation package pattern: {}", e);
                    None
                }
            })
            .collect();
        Self { navigation_packages }
    }

    pub fn from_config(config: &IslandConfig) -> Self {
        Self::new(&config.navigation_packages)
    }

    pub fn classify(&self, event: &NotificationEvent) -> IslandKind {
        let precedence: [(IslandKind, Predicate); 3] = [
            (IslandKind::Navigation, Self::is_navigation),
            (IslandKind::Timer, Self::is_timer),
            (IslandKind::Progress, Self::is_progress),
        ];
        precedence
            .into_iter()
            .find(|(_, holds)| holds(self, event))
            .map(|(kind, _)| kind)
            .unwrap_or(IslandKind::Standard)
    }

    fn is_navigation(&self, event: &NotificationEvent) -> bool {
        let by_category = event
            .category
            .as_deref()
            .map_or(false, |c| c.eq_ignore_ascii_case(CATEGORY_NAVIGATION));
        by_category || self.navigation_packages.iter().any(|re| re.is_match(&event.package))
    }

    fn is_timer(&self, event: &NotificationEvent) -> bool {
        event.uses_chronometer && event.chronometer_base > 0
    }

    fn is_progress(&self, event: &NotificationEvent) -> bool {
        event.progress_max > 0 || event.progress_indeterminate
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::from_config(&IslandConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn event(package: &str) -> NotificationEvent {
        NotificationEvent::new("k", package).with_content("title", "text")
    }

    #[rstest]
    #[case::plain(event("com.chat"), IslandKind::Standard)]
    #[case::nav_category(event("com.chat").with_category("navigation"), IslandKind::Navigation)]
    #[case::nav_package(event("com.waze"), IslandKind::Navigation)]
    #[case::nav_beats_timer(event("com.waze").with_chronometer(1_000), IslandKind::Navigation)]
    #[case::timer(event("com.clock").with_chronometer(1_000), IslandKind::Timer)]
    #[case::timer_needs_positive_base(event("com.clock").with_chronometer(0), IslandKind::Standard)]
    #[case::timer_beats_progress(event("com.dl").with_chronometer(5).with_progress(1, 10), IslandKind::Timer)]
    #[case::progress(event("com.dl").with_progress(20, 50), IslandKind::Progress)]
    #[case::progress_indeterminate(event("com.dl").with_indeterminate_progress(), IslandKind::Progress)]
    #[case::progress_zero_max(event("com.dl").with_progress(3, 0), IslandKind::Standard)]
    fn classification_precedence(#[case] input: NotificationEvent, #[case] expected: IslandKind) {
        assert_eq!(EventClassifier::default().classify(&input), expected);
    }

    #[test]
    fn chronometer_with_progress_max_is_timer() {
        let e = event("com.x").with_chronometer(1_700_000_000_000).with_progress(0, 10);
        assert_eq!(EventClassifier::default().classify(&e), IslandKind::Timer);
    }

    #[test]
    fn custom_navigation_patterns() {
        let classifier = EventClassifier::new(["^org\\.mymaps$", "(broken"]);
        assert_eq!(classifier.classify(&event("org.mymaps")), IslandKind::Navigation);
        assert_eq!(classifier.classify(&event("com.waze")), IslandKind::Standard);
    }

    #[rstest]
    #[case("MEDIA", Some(IslandKind::Custom("MEDIA".to_string())))]
    #[case("timer", Some(IslandKind::Timer))]
    #[case(" Navigation ", Some(IslandKind::Navigation))]
    #[case("", None)]
    fn tag_parsing(#[case] tag: &str, #[case] expected: Option<IslandKind>) {
        assert_eq!(IslandKind::from_tag(tag), expected);
    }
}
