//! Shortcuts generated from tabular text pasted out of a spreadsheet.
//!
//! Every line whose first tab-separated column holds a name and which
//! contains at least one email address becomes `/email_<slug>`, expanding
//! to the distinct addresses found on that line.

use crate::config::GENERATED_PREFIX;
use crate::models::Shortcut;
use crate::slug::slugify;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("email pattern is valid")
});

/// Derive the generated shortcut set from `source`.
///
/// Irregular lines (no name, no address, name that slugs to nothing, or a
/// trigger already produced by an earlier line) are skipped.
pub fn derive_shortcuts(source: &str) -> Vec<Shortcut> {
    let mut shortcuts = Vec::new();
    let mut seen_triggers = HashSet::new();

    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let emails = distinct_emails(line);
        if emails.is_empty() {
            continue;
        }

        let name = line.split('\t').next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }

        let slug = slugify(name);
        if slug.is_empty() {
            tracing::debug!(name, "skipping row whose name has no usable characters");
            continue;
        }

        let trigger = format!("{GENERATED_PREFIX}{slug}");
        if !seen_triggers.insert(trigger.clone()) {
            tracing::debug!(%trigger, "skipping row with duplicate trigger");
            continue;
        }

        shortcuts.push(Shortcut::new(trigger, emails.join("\n")));
    }

    shortcuts
}

/// Email addresses in `line`, without repeats, in order of first appearance.
fn distinct_emails(line: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    EMAIL_RE
        .find_iter(line)
        .map(|m| m.as_str())
        .filter(|email| seen.insert(*email))
        .collect()
}
