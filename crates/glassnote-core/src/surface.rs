//! The host editing surface the expansion engine works against.
//!
//! A surface is a sequence of text nodes with a caret. All offsets are
//! counted in `char`s, never bytes.

/// Index of a text node inside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Caret position: a text node and a char offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

impl Caret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

pub trait EditorSurface {
    /// The caret, or `None` when the surface has no focus or the selection
    /// spans more than one text node.
    fn caret(&self) -> Option<Caret>;

    fn node_text(&self, node: NodeId) -> Option<&str>;

    /// Replace the whole character content of `node` in one mutation.
    fn replace_node_text(&mut self, node: NodeId, text: String);

    /// Collapse the selection to `caret`.
    fn set_caret(&mut self, caret: Caret);

    /// Called once after every content mutation.
    fn content_changed(&mut self);
}

/// Byte index of the `char_offset`-th char, clamped to the end of `text`.
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// In-memory surface made of plain text runs.
#[derive(Debug, Clone)]
pub struct Document {
    runs: Vec<String>,
    anchor: Caret,
    focus: Caret,
    focused: bool,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl Document {
    /// A single-run document with the caret at the end
    pub fn from_text(text: &str) -> Self {
        Self::from_runs(vec![text.to_string()])
    }

    /// A document made of several runs, caret at the end of the last one
    pub fn from_runs(mut runs: Vec<String>) -> Self {
        if runs.is_empty() {
            runs.push(String::new());
        }
        let last = runs.len() - 1;
        let end = Caret::new(NodeId(last), char_len(&runs[last]));
        Self {
            runs,
            anchor: end,
            focus: end,
            focused: true,
            revision: 0,
        }
    }

    pub fn runs(&self) -> &[String] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.concat()
    }

    /// Incremented by every `content_changed` notification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// The caret left the editable region
    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Raw caret position, regardless of focus or selection shape
    pub fn cursor(&self) -> Caret {
        self.focus
    }

    pub fn selection(&self) -> Option<(Caret, Caret)> {
        if self.anchor == self.focus {
            None
        } else {
            Some(self.ordered())
        }
    }

    pub fn set_selection(&mut self, anchor: Caret, focus: Caret) {
        self.anchor = self.clamp(anchor);
        self.focus = self.clamp(focus);
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        let start_global = self.global_offset(start);
        let end_global = self.global_offset(end);
        Some(
            self.text()
                .chars()
                .skip(start_global)
                .take(end_global - start_global)
                .collect(),
        )
    }

    /// Char offset of `caret` within the concatenated text
    pub fn global_offset(&self, caret: Caret) -> usize {
        self.runs[..caret.node.0].iter().map(|r| char_len(r)).sum::<usize>() + caret.offset
    }

    /// Insert `text` at the caret, replacing a selection inside one run.
    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let caret = self.focus;
        let run = &mut self.runs[caret.node.0];
        let at = byte_index(run, caret.offset);
        run.insert_str(at, text);
        self.collapse(Caret::new(caret.node, caret.offset + char_len(text)));
        self.content_changed();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Delete the selection, or the char before the caret
    pub fn delete_backward(&mut self) {
        if self.delete_selection() {
            self.content_changed();
            return;
        }

        let mut caret = self.focus;
        if caret.offset == 0 {
            // Join with the end of the previous non-empty run.
            let Some(prev) = (0..caret.node.0).rev().find(|i| !self.runs[*i].is_empty()) else {
                return;
            };
            caret = Caret::new(NodeId(prev), char_len(&self.runs[prev]));
        }

        let run = &mut self.runs[caret.node.0];
        let start = byte_index(run, caret.offset - 1);
        let end = byte_index(run, caret.offset);
        run.replace_range(start..end, "");
        self.collapse(Caret::new(caret.node, caret.offset - 1));
        self.content_changed();
    }

    pub fn move_left(&mut self, extend: bool) {
        let caret = self.focus;
        let target = if caret.offset > 0 {
            Caret::new(caret.node, caret.offset - 1)
        } else if caret.node.0 > 0 {
            let prev = caret.node.0 - 1;
            Caret::new(NodeId(prev), char_len(&self.runs[prev]))
        } else {
            caret
        };
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let caret = self.focus;
        let len = char_len(&self.runs[caret.node.0]);
        let target = if caret.offset < len {
            Caret::new(caret.node, caret.offset + 1)
        } else if caret.node.0 + 1 < self.runs.len() {
            Caret::new(NodeId(caret.node.0 + 1), 0)
        } else {
            caret
        };
        self.move_to(target, extend);
    }

    /// Move one line up inside the current run, keeping the column
    pub fn move_up(&mut self) {
        let caret = self.focus;
        let lines = line_starts(&self.runs[caret.node.0]);
        let (row, col) = row_col(&lines, caret.offset);
        if row == 0 {
            self.collapse(Caret::new(caret.node, 0));
            return;
        }
        let width = lines[row] - lines[row - 1] - 1;
        self.collapse(Caret::new(caret.node, lines[row - 1] + col.min(width)));
    }

    /// Move one line down inside the current run, keeping the column
    pub fn move_down(&mut self) {
        let caret = self.focus;
        let run = &self.runs[caret.node.0];
        let total = char_len(run);
        let lines = line_starts(run);
        let (row, col) = row_col(&lines, caret.offset);
        if row + 1 >= lines.len() {
            self.collapse(Caret::new(caret.node, total));
            return;
        }
        let next_end = lines.get(row + 2).map(|start| start - 1).unwrap_or(total);
        let width = next_end - lines[row + 1];
        self.collapse(Caret::new(caret.node, lines[row + 1] + col.min(width)));
    }

    /// Remove the caret's line from its run.
    ///
    /// The caret lands at the start of the line that takes its place, or
    /// of the previous line when the last one was removed.
    pub fn delete_line(&mut self) {
        let caret = self.focus;
        let run = &mut self.runs[caret.node.0];
        let total = char_len(run);
        let lines = line_starts(run);
        let (row, _) = row_col(&lines, caret.offset);

        let (from, to, landing) = match lines.get(row + 1) {
            Some(next) => (lines[row], *next, lines[row]),
            None if row > 0 => (lines[row] - 1, total, lines[row - 1]),
            None => (0, total, 0),
        };
        let range = byte_index(run, from)..byte_index(run, to);
        run.replace_range(range, "");

        self.collapse(Caret::new(caret.node, landing));
        self.content_changed();
    }

    /// Copy the caret's line below itself and move the caret onto the copy
    pub fn duplicate_line(&mut self) {
        let caret = self.focus;
        let run = &mut self.runs[caret.node.0];
        let total = char_len(run);
        let lines = line_starts(run);
        let (row, col) = row_col(&lines, caret.offset);

        let end = lines.get(row + 1).map(|next| next - 1).unwrap_or(total);
        let line: String = run.chars().skip(lines[row]).take(end - lines[row]).collect();
        let at = byte_index(run, end);
        run.insert_str(at, &format!("\n{}", line));

        self.collapse(Caret::new(caret.node, end + 1 + col));
        self.content_changed();
    }

    fn move_to(&mut self, target: Caret, extend: bool) {
        if extend {
            self.focus = target;
        } else {
            self.collapse(target);
        }
    }

    fn collapse(&mut self, caret: Caret) {
        let caret = self.clamp(caret);
        self.anchor = caret;
        self.focus = caret;
    }

    fn ordered(&self) -> (Caret, Caret) {
        let a = (self.anchor.node, self.anchor.offset);
        let f = (self.focus.node, self.focus.offset);
        if a <= f {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    /// Remove the selected text; returns whether anything was removed
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            return false;
        };

        for index in (start.node.0..=end.node.0).rev() {
            let run = &mut self.runs[index];
            let from = if index == start.node.0 { start.offset } else { 0 };
            let to = if index == end.node.0 {
                end.offset
            } else {
                char_len(run)
            };
            let range = byte_index(run, from)..byte_index(run, to);
            run.replace_range(range, "");
        }
        self.collapse(start);
        true
    }

    fn clamp(&self, caret: Caret) -> Caret {
        let node = caret.node.0.min(self.runs.len() - 1);
        let offset = caret.offset.min(char_len(&self.runs[node]));
        Caret::new(NodeId(node), offset)
    }
}

impl EditorSurface for Document {
    fn caret(&self) -> Option<Caret> {
        if !self.focused || self.anchor.node != self.focus.node {
            return None;
        }
        Some(self.ordered().0)
    }

    fn node_text(&self, node: NodeId) -> Option<&str> {
        self.runs.get(node.0).map(String::as_str)
    }

    fn replace_node_text(&mut self, node: NodeId, text: String) {
        if let Some(run) = self.runs.get_mut(node.0) {
            *run = text;
        }
        self.anchor = self.clamp(self.anchor);
        self.focus = self.clamp(self.focus);
    }

    fn set_caret(&mut self, caret: Caret) {
        self.collapse(caret);
    }

    fn content_changed(&mut self) {
        self.revision += 1;
    }
}

/// Char offsets at which each line of `text` starts
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn row_col(line_starts: &[usize], offset: usize) -> (usize, usize) {
    let row = line_starts
        .iter()
        .rposition(|start| *start <= offset)
        .unwrap_or(0);
    (row, offset - line_starts[row])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_track_the_caret() {
        let mut doc = Document::default();
        for c in "héllo".chars() {
            doc.insert_char(c);
        }
        assert_eq!(doc.text(), "héllo");
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(0), 5)));

        doc.move_left(false);
        doc.delete_backward();
        assert_eq!(doc.text(), "hélo");
        assert_eq!(doc.caret(), Some(Caret::new(NodeId(0), 3)));
    }

    #[test]
    fn cross_node_selection_has_no_caret() {
        let mut doc = Document::from_runs(vec!["bold".into(), " plain".into()]);
        doc.set_selection(Caret::new(NodeId(0), 2), Caret::new(NodeId(1), 3));
        assert_eq!(doc.caret(), None);
        assert_eq!(doc.selected_text().as_deref(), Some("ld pl"));

        doc.insert_str("X");
        assert_eq!(doc.text(), "boXain");
        assert!(doc.caret().is_some());
    }

    #[test]
    fn blurred_document_has_no_caret() {
        let mut doc = Document::from_text("abc");
        doc.blur();
        assert_eq!(doc.caret(), None);
        doc.focus();
        assert!(doc.caret().is_some());
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut doc = Document::from_text("first line\nab\nthird line");
        doc.set_caret(Caret::new(NodeId(0), 8));
        doc.move_down();
        assert_eq!(doc.cursor().offset, 13);
        doc.move_down();
        assert_eq!(doc.cursor().offset, 16);
        doc.move_up();
        doc.move_up();
        assert_eq!(doc.cursor().offset, 2);
        doc.move_up();
        assert_eq!(doc.cursor().offset, 0);
    }

    #[test]
    fn horizontal_movement_crosses_runs() {
        let mut doc = Document::from_runs(vec!["ab".into(), "cd".into()]);
        doc.set_caret(Caret::new(NodeId(0), 2));
        doc.move_right(false);
        assert_eq!(doc.cursor(), Caret::new(NodeId(1), 0));
        doc.move_left(false);
        assert_eq!(doc.cursor(), Caret::new(NodeId(0), 2));
    }

    #[test]
    fn delete_line_removes_the_caret_line() {
        let mut doc = Document::from_text("one\ntwo\nthree");
        doc.set_caret(Caret::new(NodeId(0), 5));
        doc.delete_line();
        assert_eq!(doc.text(), "one\nthree");
        assert_eq!(doc.cursor().offset, 4);
        assert_eq!(doc.revision(), 1);

        doc.set_caret(Caret::new(NodeId(0), 7));
        doc.delete_line();
        assert_eq!(doc.text(), "one");
        assert_eq!(doc.cursor().offset, 0);

        doc.delete_line();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.revision(), 3);
    }

    #[test]
    fn duplicate_line_copies_below_and_follows_the_copy() {
        let mut doc = Document::from_text("ab\ncd");
        doc.set_caret(Caret::new(NodeId(0), 1));
        doc.duplicate_line();
        assert_eq!(doc.text(), "ab\nab\ncd");
        assert_eq!(doc.cursor().offset, 4);
        assert_eq!(doc.revision(), 1);

        doc.set_caret(Caret::new(NodeId(0), 8));
        doc.duplicate_line();
        assert_eq!(doc.text(), "ab\nab\ncd\ncd");
        assert_eq!(doc.cursor().offset, 11);
    }

    #[test]
    fn duplicate_line_handles_multibyte_text() {
        let mut doc = Document::from_text("olá");
        doc.duplicate_line();
        assert_eq!(doc.text(), "olá\nolá");
        assert_eq!(doc.cursor().offset, 7);
    }

    #[test]
    fn edits_notify_content_changed() {
        let mut doc = Document::default();
        doc.insert_str("ab");
        doc.delete_backward();
        assert_eq!(doc.revision(), 2);
    }
}
