//! Unified lookup table over manual and generated shortcuts.

use crate::config::MAX_SUGGESTIONS;
use crate::deriver::derive_shortcuts;
use crate::models::{Shortcut, ShortcutOrigin};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub shortcut: Shortcut,
    pub origin: ShortcutOrigin,
}

/// Trigger-unique, precedence-ordered snapshot of every known shortcut.
///
/// Manual shortcuts come first in store order, followed by the shortcuts
/// generated from the tabular source. A generated shortcut never shadows a
/// manual one with the same trigger; it is left out of the snapshot.
#[derive(Debug, Clone, Default)]
pub struct ShortcutRegistry {
    entries: Vec<RegistryEntry>,
}

impl ShortcutRegistry {
    /// Build a fresh registry from the manual shortcuts and tabular source.
    ///
    /// Call again whenever either input changes; the result depends on
    /// nothing else.
    pub fn rebuild(manual: &[Shortcut], source_text: &str) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries = Vec::with_capacity(manual.len());

        for shortcut in manual {
            if seen.insert(shortcut.trigger.as_str()) {
                entries.push(RegistryEntry {
                    shortcut: shortcut.clone(),
                    origin: ShortcutOrigin::Manual,
                });
            }
        }

        let generated = derive_shortcuts(source_text);
        let mut shadowed = 0usize;
        for shortcut in generated {
            if seen.contains(shortcut.trigger.as_str()) {
                shadowed += 1;
                continue;
            }
            entries.push(RegistryEntry {
                shortcut,
                origin: ShortcutOrigin::Generated,
            });
        }

        tracing::debug!(
            manual = manual.len(),
            total = entries.len(),
            shadowed,
            "rebuilt shortcut registry"
        );
        Self { entries }
    }

    /// The shortcut whose trigger is exactly `trigger`
    pub fn find_exact(&self, trigger: &str) -> Option<&Shortcut> {
        self.entries
            .iter()
            .map(|entry| &entry.shortcut)
            .find(|shortcut| shortcut.trigger == trigger)
    }

    /// Up to five shortcuts whose trigger starts with `partial`, in
    /// registry order
    pub fn find_by_prefix(&self, partial: &str) -> Vec<&Shortcut> {
        self.entries
            .iter()
            .map(|entry| &entry.shortcut)
            .filter(|shortcut| shortcut.trigger.starts_with(partial))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn with_origin(&self, origin: ShortcutOrigin) -> impl Iterator<Item = &Shortcut> {
        self.entries
            .iter()
            .filter(move |entry| entry.origin == origin)
            .map(|entry| &entry.shortcut)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers(shortcuts: &[&Shortcut]) -> Vec<String> {
        shortcuts.iter().map(|s| s.trigger.clone()).collect()
    }

    #[test]
    fn manual_wins_over_generated() {
        let manual = vec![Shortcut::new("email_acme", "manual@acme.com")];
        let registry = ShortcutRegistry::rebuild(&manual, "Acme\tbulk@acme.com");

        let found = registry.find_exact("email_acme").unwrap();
        assert_eq!(found.content, "manual@acme.com");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn manual_entries_come_first() {
        let manual = vec![Shortcut::new("zz", "manual")];
        let registry = ShortcutRegistry::rebuild(&manual, "Alpha\ta@a.io");
        let origins: Vec<_> = registry.entries().iter().map(|e| e.origin).collect();
        assert_eq!(origins, vec![ShortcutOrigin::Manual, ShortcutOrigin::Generated]);
        assert_eq!(registry.with_origin(ShortcutOrigin::Generated).count(), 1);
    }

    #[test]
    fn prefix_lookup_caps_at_five_in_composition_order() {
        let manual: Vec<_> = (1..=4)
            .map(|i| Shortcut::new(format!("email_m{i}"), format!("m{i}")))
            .collect();
        let source = (1..=4)
            .map(|i| format!("G{i}\tg{i}@x.com"))
            .collect::<Vec<_>>()
            .join("\n");
        let registry = ShortcutRegistry::rebuild(&manual, &source);
        assert_eq!(registry.len(), 8);

        let found = registry.find_by_prefix("email_");
        assert_eq!(
            triggers(&found),
            vec!["email_m1", "email_m2", "email_m3", "email_m4", "email_g1"]
        );
    }

    #[test]
    fn prefix_lookup_is_case_sensitive() {
        let registry = ShortcutRegistry::rebuild(&[Shortcut::new("Sig", "x")], "");
        assert!(registry.find_by_prefix("sig").is_empty());
        assert_eq!(registry.find_by_prefix("Si").len(), 1);
    }

    #[test]
    fn exact_lookup_misses_partial_triggers() {
        let registry = ShortcutRegistry::rebuild(&[Shortcut::new("test", "World")], "");
        assert!(registry.find_exact("tes").is_none());
        assert!(registry.find_exact("test").is_some());
    }

    #[test]
    fn rebuild_reflects_new_inputs() {
        let before = ShortcutRegistry::rebuild(&[], "Old\told@x.com");
        assert!(before.find_exact("email_old").is_some());

        let after = ShortcutRegistry::rebuild(&[], "New\tnew@x.com");
        assert!(after.find_exact("email_old").is_none());
        assert!(after.find_exact("email_new").is_some());
    }
}
