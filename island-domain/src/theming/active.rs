//! Active theme state.
//!
//! A single slot holding the current theme, published atomically with
//! `arc-swap`. Readers take an `Arc` snapshot and keep using it for the whole
//! event even if the slot is swapped meanwhile; no lock is held across a
//! resolve or match pass.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use super::types::{Theme, ThemeId};

#[derive(Debug, Default)]
pub struct ActiveTheme {
    slot: ArcSwapOption<Theme>,
}

impl ActiveTheme {
    pub fn new() -> Self {
        Self { slot: ArcSwapOption::empty() }
    }

    /// Consistent view of the current theme, `None` when rendering defaults.
    pub fn snapshot(&self) -> Option<Arc<Theme>> {
        self.slot.load_full()
    }

    pub fn active_id(&self) -> Option<ThemeId> {
        self.slot.load().as_ref().map(|theme| theme.id.clone())
    }

    pub fn is_active(&self, id: &ThemeId) -> bool {
        self.slot.load().as_ref().map_or(false, |theme| &theme.id == id)
    }

    pub fn publish(&self, theme: Theme) {
        self.slot.store(Some(Arc::new(theme)));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }

    /// Clears the slot only if it still holds `id`. Returns whether it did.
    pub fn clear_if(&self, id: &ThemeId) -> bool {
        let current = self.slot.load_full();
        match current {
            Some(theme) if &theme.id == id => {
                let previous = self.slot.compare_and_swap(&Some(theme.clone()), None);
                matches!(&*previous, Some(prev) if Arc::ptr_eq(prev, &theme))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn publish_and_clear() {
        let active = ActiveTheme::new();
        assert!(active.snapshot().is_none());

        let theme = Theme::new("Neon");
        let id = theme.id.clone();
        active.publish(theme);
        assert_eq!(active.active_id(), Some(id.clone()));
        assert!(active.is_active(&id));

        assert!(!active.clear_if(&ThemeId::new("other")));
        assert!(active.snapshot().is_some());
        assert!(active.clear_if(&id));
        assert!(active.snapshot().is_none());
    }

    #[test]
    fn snapshot_survives_swap() {
        let active = ActiveTheme::new();
        active.publish(Theme::new("First"));
        let held = active.snapshot().unwrap();
        active.publish(Theme::new("Second"));
        assert_eq!(held.meta.name, "First");
        assert_eq!(active.snapshot().unwrap().meta.name, "Second");
    }

    #[test]
    fn concurrent_readers_see_whole_themes() {
        let active = Arc::new(ActiveTheme::new());
        let writer = {
            let active = active.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let mut theme = Theme::new(format!("t{}", i));
                    theme.global.highlight_color = Some(format!("#{:06}", i));
                    active.publish(theme);
                }
            })
        };
        let reader = {
            let active = active.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(theme) = active.snapshot() {
                        let n: u32 = theme.meta.name[1..].parse().unwrap();
                        assert_eq!(theme.global.highlight_color, Some(format!("#{:06}", n)));
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
    }
}
