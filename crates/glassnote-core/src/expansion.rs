//! In-place replacement of `/trigger` with shortcut content.

use crate::models::Shortcut;
use crate::registry::ShortcutRegistry;
use crate::scanner::{scan, CaretContext};
use crate::surface::{byte_index, char_len, Caret, EditorSurface};

/// Result of an expansion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// The text was replaced and the caret now sits after the content.
    Expanded { caret: Caret },
    /// Nothing was changed.
    Aborted,
}

impl ExpansionOutcome {
    pub fn is_expanded(&self) -> bool {
        matches!(self, ExpansionOutcome::Expanded { .. })
    }
}

/// Replace the `/fragment` before the caret with `shortcut.content`.
///
/// The node is rewritten in a single mutation and the caret moves to the
/// end of the inserted content in the same node, after which the surface
/// is notified once. If the context no longer fits the node (span starting
/// before the node, caret past its end, or text that is not `/fragment`)
/// nothing is touched.
pub fn expand<S: EditorSurface + ?Sized>(
    surface: &mut S,
    ctx: &CaretContext,
    shortcut: &Shortcut,
) -> ExpansionOutcome {
    let Some(start) = ctx.deletion_start() else {
        tracing::warn!(
            fragment = %ctx.fragment,
            offset = ctx.caret.offset,
            "expansion span starts before the text node, aborting"
        );
        return ExpansionOutcome::Aborted;
    };

    let Some(text) = surface.node_text(ctx.caret.node) else {
        tracing::warn!(node = ctx.caret.node.0, "expansion target node is gone, aborting");
        return ExpansionOutcome::Aborted;
    };

    if ctx.caret.offset > char_len(text) {
        tracing::warn!(
            offset = ctx.caret.offset,
            "caret is past the end of its text node, aborting expansion"
        );
        return ExpansionOutcome::Aborted;
    }

    let start_byte = byte_index(text, start);
    let end_byte = byte_index(text, ctx.caret.offset);
    let span = &text[start_byte..end_byte];
    if span.strip_prefix(crate::config::TRIGGER_CHAR) != Some(ctx.fragment.as_str()) {
        tracing::warn!(found = span, fragment = %ctx.fragment, "text before caret changed, aborting expansion");
        return ExpansionOutcome::Aborted;
    }

    let mut replaced = String::with_capacity(text.len() + shortcut.content.len());
    replaced.push_str(&text[..start_byte]);
    replaced.push_str(&shortcut.content);
    replaced.push_str(&text[end_byte..]);

    let caret = Caret::new(ctx.caret.node, start + char_len(&shortcut.content));
    surface.replace_node_text(ctx.caret.node, replaced);
    surface.set_caret(caret);
    surface.content_changed();

    tracing::debug!(trigger = %shortcut.trigger, "expanded shortcut");
    ExpansionOutcome::Expanded { caret }
}

/// Expand the fragment before the caret if it names a shortcut exactly.
///
/// Hosts call this when a delimiter key is pressed, before inserting the
/// delimiter itself.
pub fn expand_exact<S: EditorSurface + ?Sized>(
    surface: &mut S,
    registry: &ShortcutRegistry,
) -> ExpansionOutcome {
    let Some(ctx) = scan(&*surface) else {
        return ExpansionOutcome::Aborted;
    };
    match registry.find_exact(&ctx.fragment) {
        Some(shortcut) => expand(surface, &ctx, shortcut),
        None => ExpansionOutcome::Aborted,
    }
}

/// Expand every `/trigger` in `text` that names a shortcut exactly.
///
/// A trigger ends at the first char that cannot be part of one. Used for
/// text that never passed through an interactive surface, such as a
/// message typed on the command line.
pub fn expand_all(text: &str, registry: &ShortcutRegistry) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(slash) = rest.find(crate::config::TRIGGER_CHAR) {
        out.push_str(&rest[..slash]);
        let after = &rest[slash + 1..];
        let len = after
            .find(|c: char| !crate::models::is_trigger_char(c))
            .unwrap_or(after.len());
        let trigger = &after[..len];

        match registry.find_exact(trigger).filter(|_| !trigger.is_empty()) {
            Some(shortcut) => out.push_str(&shortcut.content),
            None => {
                out.push(crate::config::TRIGGER_CHAR);
                out.push_str(trigger);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Document, NodeId};

    fn registry(shortcuts: &[(&str, &str)]) -> ShortcutRegistry {
        let manual: Vec<_> = shortcuts
            .iter()
            .map(|(t, c)| Shortcut::new(*t, *c))
            .collect();
        ShortcutRegistry::rebuild(&manual, "")
    }

    #[test]
    fn expands_in_place_and_moves_caret_after_content() {
        let mut doc = Document::from_text("Hello /test ");
        doc.set_caret(Caret::new(NodeId(0), 11));
        let ctx = scan(&doc).unwrap();
        let shortcut = Shortcut::new("test", "World");

        let outcome = expand(&mut doc, &ctx, &shortcut);

        assert_eq!(doc.text(), "Hello World ");
        assert_eq!(
            outcome,
            ExpansionOutcome::Expanded {
                caret: Caret::new(NodeId(0), 11)
            }
        );
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(0), 11)));
    }

    #[test]
    fn notifies_content_changed_exactly_once() {
        let mut doc = Document::from_text("/sig");
        let before = doc.revision();
        let ctx = scan(&doc).unwrap();
        expand(&mut doc, &ctx, &Shortcut::new("sig", "Regards,\nAna"));
        assert_eq!(doc.revision(), before + 1);
        assert_eq!(doc.text(), "Regards,\nAna");
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(0), 12)));
    }

    #[test]
    fn leaves_other_nodes_untouched() {
        let mut doc = Document::from_runs(vec!["bold ".into(), "x /a y".into(), " tail".into()]);
        doc.set_caret(Caret::new(NodeId(1), 4));
        let ctx = scan(&doc).unwrap();
        expand(&mut doc, &ctx, &Shortcut::new("a", "ALPHA"));
        assert_eq!(doc.runs(), &["bold ", "x ALPHA y", " tail"]);
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(1), 7)));
    }

    #[test]
    fn aborts_when_span_exceeds_text() {
        let mut doc = Document::from_text("ab");
        let ctx = CaretContext {
            caret: Caret::new(NodeId(0), 2),
            fragment: "abc".into(),
        };
        let outcome = expand(&mut doc, &ctx, &Shortcut::new("abc", "x"));
        assert_eq!(outcome, ExpansionOutcome::Aborted);
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn aborts_on_stale_context() {
        let mut doc = Document::from_text("/abc");
        let ctx = scan(&doc).unwrap();
        doc.replace_node_text(NodeId(0), "zzzz".into());
        let outcome = expand(&mut doc, &ctx, &Shortcut::new("abc", "x"));
        assert_eq!(outcome, ExpansionOutcome::Aborted);
        assert_eq!(doc.text(), "zzzz");
    }

    #[test]
    fn exact_expansion_requires_a_full_trigger() {
        let registry = registry(&[("test", "World")]);

        let mut partial = Document::from_text("Hello /tes");
        assert!(!expand_exact(&mut partial, &registry).is_expanded());
        assert_eq!(partial.text(), "Hello /tes");

        let mut full = Document::from_text("Hello /test");
        assert!(expand_exact(&mut full, &registry).is_expanded());
        assert_eq!(full.text(), "Hello World");
    }

    #[test]
    fn expands_unicode_content_with_char_offsets() {
        let mut doc = Document::from_text("ção /cafe!");
        doc.set_caret(Caret::new(NodeId(0), 9));
        let ctx = scan(&doc).unwrap();
        expand(&mut doc, &ctx, &Shortcut::new("cafe", "café ☕"));
        assert_eq!(doc.text(), "ção café ☕!");
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(0), 10)));
    }

    #[test]
    fn expand_all_replaces_known_triggers_only() {
        let registry = registry(&[("hi", "Hello"), ("sig", "-- Ana")]);
        assert_eq!(
            expand_all("/hi Bob, see /unknown and a/b\n/sig", &registry),
            "Hello Bob, see /unknown and a/b\n-- Ana"
        );
        assert_eq!(expand_all("trailing /", &registry), "trailing /");
    }
}
