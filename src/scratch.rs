// SPDX-License-Identifier: MIT
//
// Scratch pad: a small in-memory editing engine for the terminal host.
//
// It is deliberately modest: one document, one selection, snapshot undo.
// What it does exercise is every path through the host. A line-number margin
// painted with the margin roles, selection backgrounds under syntax-colored
// text, a visible-whitespace marker, a caret, and clipboard events.
//
// View tree:
//
//   Frame (whole area, paints nothing)
//   ├── Gutter  (line numbers, margin background)
//   └── Editor  (text, selection, caret)

use th_host::action::Action;
use th_host::color::Color;
use th_host::engine::{ClipboardEvent, ClipboardEventKind, EditorEngine, Surface, View};
use th_host::platform::{CursorKind, SemanticRenderer};
use th_host::width::Advance;
use th_term::screen::ClipRect;

/// Shown on startup.
pub const WELCOME: &str = "Shortcuts:\n\
\n\
Ctrl+Q: Quit\n\
Ctrl+X: Cut\n\
Ctrl+C: Copy\n\
Ctrl+V: Paste\n\
Ctrl+A: Select All\n\
Ctrl+Z: Undo\n\
Ctrl+Y: Redo\n";

/// The engine's visible-whitespace marker.
const WHITESPACE_MARK: &str = "\u{b7}";

const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "fn", "for", "if", "impl", "in", "let",
    "loop", "match", "mod", "mut", "pub", "return", "static", "struct", "trait", "type", "use",
    "where", "while",
];

const KEYWORD_CONSTANTS: &[&str] = &["true", "false", "self", "Self", "None", "Some"];

// ─── Document ────────────────────────────────────────────────────────────────

/// A caret or anchor position. `col` counts chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Document {
    lines: Vec<String>,
    caret: Pos,
    anchor: Option<Pos>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            caret: Pos::default(),
            anchor: None,
        }
    }
}

fn byte_at(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

const fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl Document {
    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| char_len(l))
    }

    fn end(&self) -> Pos {
        let last = self.lines.len() - 1;
        Pos::new(last, self.line_len(last))
    }

    /// The selection as an ordered, non-empty range.
    fn selection(&self) -> Option<(Pos, Pos)> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.caret) {
            std::cmp::Ordering::Less => Some((anchor, self.caret)),
            std::cmp::Ordering::Greater => Some((self.caret, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The caret's whole line, including its newline when there is one.
    fn line_range(&self) -> (Pos, Pos) {
        let line = self.caret.line;
        let end = if line + 1 < self.lines.len() {
            Pos::new(line + 1, 0)
        } else {
            Pos::new(line, self.line_len(line))
        };
        (Pos::new(line, 0), end)
    }

    fn text_in(&self, start: Pos, end: Pos) -> String {
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_at(line, start.col)..byte_at(line, end.col)].to_owned();
        }
        let first = &self.lines[start.line];
        let mut out = first[byte_at(first, start.col)..].to_owned();
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        let last = &self.lines[end.line];
        out.push('\n');
        out.push_str(&last[..byte_at(last, end.col)]);
        out
    }

    fn delete(&mut self, start: Pos, end: Pos) {
        let tail = {
            let last = &self.lines[end.line];
            last[byte_at(last, end.col)..].to_owned()
        };
        let first = &mut self.lines[start.line];
        first.truncate(byte_at(first, start.col));
        first.push_str(&tail);
        self.lines.drain(start.line + 1..=end.line);
        self.caret = start;
        self.anchor = None;
    }

    fn insert(&mut self, text: &str) {
        if let Some((start, end)) = self.selection() {
            self.delete(start, end);
        }
        self.anchor = None;

        let Pos { mut line, col } = self.caret;
        let current = &mut self.lines[line];
        let tail = current.split_off(byte_at(current, col));

        let mut parts = text.split('\n');
        let first = parts.next().unwrap_or_default();
        self.lines[line].push_str(first);
        let mut caret_col = col + char_len(first);

        for part in parts {
            line += 1;
            self.lines.insert(line, part.to_owned());
            caret_col = char_len(part);
        }
        self.lines[line].push_str(&tail);
        self.caret = Pos::new(line, caret_col);
    }

    // ─── Motions ─────────────────────────────────────────────────────────

    fn left(&self, p: Pos) -> Pos {
        if p.col > 0 {
            Pos::new(p.line, p.col - 1)
        } else if p.line > 0 {
            Pos::new(p.line - 1, self.line_len(p.line - 1))
        } else {
            p
        }
    }

    fn right(&self, p: Pos) -> Pos {
        if p.col < self.line_len(p.line) {
            Pos::new(p.line, p.col + 1)
        } else if p.line + 1 < self.lines.len() {
            Pos::new(p.line + 1, 0)
        } else {
            p
        }
    }

    fn vertical(&self, p: Pos, delta: isize) -> Pos {
        let last = self.lines.len() - 1;
        let line = p.line.saturating_add_signed(delta).min(last);
        Pos::new(line, p.col.min(self.line_len(line)))
    }

    fn word_right(&self, p: Pos) -> Pos {
        let chars: Vec<char> = self.lines[p.line].chars().collect();
        if p.col >= chars.len() {
            return self.right(p);
        }
        let mut col = p.col;
        while col < chars.len() && !is_word(chars[col]) {
            col += 1;
        }
        while col < chars.len() && is_word(chars[col]) {
            col += 1;
        }
        Pos::new(p.line, col)
    }

    fn word_left(&self, p: Pos) -> Pos {
        if p.col == 0 {
            return self.left(p);
        }
        let chars: Vec<char> = self.lines[p.line].chars().collect();
        let mut col = p.col.min(chars.len());
        while col > 0 && !is_word(chars[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word(chars[col - 1]) {
            col -= 1;
        }
        Pos::new(p.line, col)
    }
}

// ─── Syntax ──────────────────────────────────────────────────────────────────

/// A colored run of a line, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub color: Color,
}

/// Split a line into colored runs covering it end to end.
#[must_use]
pub fn classify(line: &str) -> Vec<Span> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut after_fn = false;
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let ch = chars[i];
        let color = if ch == '/' && chars.get(i + 1) == Some(&'/') {
            i = chars.len();
            Color::ForegroundComment
        } else if ch == '"' {
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                i += if chars[i] == '\\' { 2 } else { 1 };
            }
            i = (i + 1).min(chars.len());
            Color::ForegroundString
        } else if ch.is_ascii_digit() {
            while i < chars.len() && (is_word(chars[i]) || chars[i] == '.') {
                i += 1;
            }
            Color::ForegroundNumber
        } else if is_word(ch) {
            while i < chars.len() && is_word(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let color = if after_fn {
                Color::ForegroundDefinition
            } else if KEYWORDS.contains(&word.as_str()) {
                Color::ForegroundKeyword
            } else if KEYWORD_CONSTANTS.contains(&word.as_str()) {
                Color::ForegroundKeywordConstant
            } else if word.len() > 1 && word.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                Color::ForegroundConstant
            } else {
                Color::ForegroundDefault
            };
            after_fn = word == "fn";
            color
        } else {
            while i < chars.len() && !is_word(chars[i]) && chars[i] != '"' && chars[i] != '/' {
                i += 1;
            }
            // A lone `/` that does not start a comment.
            if i == start {
                i += 1;
            }
            if !chars[start..i].iter().all(|c| c.is_whitespace()) {
                after_fn = false;
            }
            Color::ForegroundDefault
        };
        spans.push(Span {
            start,
            end: i,
            color,
        });
    }
    spans
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// What the views need to know about the document, refreshed after every
/// change.
#[derive(Debug, Clone, Default)]
struct Layout {
    width: u16,
    height: u16,
    gutter_width: u16,
    scroll: usize,
}

impl Layout {
    fn visible_rows(&self) -> usize {
        usize::from(self.height)
    }
}

#[derive(Debug, Default)]
struct Gutter {
    layout: Layout,
    line_count: usize,
    caret_line: usize,
}

impl View for Gutter {
    fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.layout.gutter_width, self.layout.height)
    }

    fn render(&self, r: &mut dyn SemanticRenderer) {
        let width = i32::from(self.layout.gutter_width);
        r.render_rect(0, 0, width, i32::from(self.layout.height), Color::BackgroundMargin);

        let lines = (self.layout.scroll..self.line_count).take(self.layout.visible_rows());
        for (row, line) in (0..).zip(lines) {
            let label = (line + 1).to_string();
            // One cell of padding on the right.
            let x = width - 1 - i32::try_from(label.len()).unwrap_or(0);
            let color = if line == self.caret_line {
                Color::ForegroundMarginHighlighted
            } else {
                Color::ForegroundMargin
            };
            r.render_text(x, row, &label, color, 1.0);
        }
    }
}

#[derive(Debug, Default)]
struct Editor {
    layout: Layout,
    doc: Document,
    /// The host's per-codepoint advance, taken at attach.
    advance: Advance,
}

impl Editor {
    /// Cells a run of chars takes once painted.
    fn display_width(&self, chars: &[char]) -> i32 {
        let cells: usize = chars.iter().map(|&c| self.advance.width(u32::from(c))).sum();
        i32::try_from(cells).unwrap_or(i32::MAX)
    }

    fn render_line(&self, r: &mut dyn SemanticRenderer, row: i32, index: usize) {
        let line = &self.doc.lines[index];
        let chars: Vec<char> = line.chars().collect();
        let column = |col: usize| self.display_width(&chars[..col.min(chars.len())]);

        if let Some((start, end)) = self.doc.selection() {
            if (start.line..=end.line).contains(&index) {
                let from = if start.line == index { start.col } else { 0 };
                // Selected newlines show as one extra cell.
                let to = if end.line == index {
                    column(end.col)
                } else {
                    column(chars.len()) + 1
                };
                r.render_rect(column(from), row, to - column(from), 1, Color::BackgroundSelected);
            }
        }

        let trailing = chars.len() - chars.iter().rev().take_while(|c| **c == ' ').count();
        for span in classify(line) {
            let end = span.end.min(trailing);
            if span.start < end {
                let text: String = chars[span.start..end].iter().collect();
                r.render_text(column(span.start), row, &text, span.color, 1.0);
            }
        }
        for col in trailing..chars.len() {
            r.render_text(column(col), row, WHITESPACE_MARK, Color::ForegroundComment, 1.0);
        }
    }
}

impl View for Editor {
    fn bounds(&self) -> ClipRect {
        let gutter = self.layout.gutter_width;
        ClipRect::new(
            i32::from(gutter),
            0,
            self.layout.width.saturating_sub(gutter),
            self.layout.height,
        )
    }

    fn render(&self, r: &mut dyn SemanticRenderer) {
        let lines = (self.layout.scroll..self.doc.lines.len()).take(self.layout.visible_rows());
        for (row, index) in (0..).zip(lines) {
            self.render_line(r, row, index);
        }

        let caret = self.doc.caret;
        if let Some(row) = caret.line.checked_sub(self.layout.scroll) {
            let chars: Vec<char> = self.doc.lines[caret.line].chars().collect();
            let x = self.display_width(&chars[..caret.col.min(chars.len())]);
            r.render_caret(x, i32::try_from(row).unwrap_or(i32::MAX));
        }
    }
}

#[derive(Debug, Default)]
struct Frame {
    layout: Layout,
    gutter: Gutter,
    editor: Editor,
}

impl View for Frame {
    fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.layout.width, self.layout.height)
    }

    fn render(&self, _r: &mut dyn SemanticRenderer) {}

    fn children(&self) -> Vec<&dyn View> {
        vec![&self.gutter, &self.editor]
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ScratchEditor {
    frame: Frame,
    undo: Vec<Document>,
    redo: Vec<Document>,
}

impl ScratchEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn doc(&self) -> &Document {
        &self.frame.editor.doc
    }

    const fn doc_mut(&mut self) -> &mut Document {
        &mut self.frame.editor.doc
    }

    /// Record the document before an edit.
    fn checkpoint(&mut self) {
        let snapshot = self.doc().clone();
        self.undo.push(snapshot);
        self.redo.clear();
    }

    fn motion(&mut self, select: bool, to: impl FnOnce(&Document, Pos) -> Pos) {
        let doc = self.doc_mut();
        if select {
            doc.anchor.get_or_insert(doc.caret);
        } else {
            doc.anchor = None;
        }
        doc.caret = to(doc, doc.caret);
    }

    fn delete_or(&mut self, fallback: impl FnOnce(&Document, Pos) -> Pos) {
        let doc = self.doc();
        let (start, end) = doc.selection().unwrap_or_else(|| {
            let other = fallback(doc, doc.caret);
            (other.min(doc.caret), other.max(doc.caret))
        });
        if start != end {
            self.checkpoint();
            self.doc_mut().delete(start, end);
        }
    }

    /// The selection, or the caret's whole line when nothing is selected.
    fn clip_range(&self) -> (Pos, Pos) {
        self.doc().selection().unwrap_or_else(|| self.doc().line_range())
    }

    fn page(&self) -> isize {
        isize::try_from(self.frame.layout.height.saturating_sub(1).max(1)).unwrap_or(1)
    }

    /// Propagate size and document changes to the views, scrolling the
    /// caret into view.
    fn sync(&mut self) {
        let line_count = self.doc().lines.len();
        let caret_line = self.doc().caret.line;
        let layout = &mut self.frame.layout;

        let digits = u16::try_from(line_count.to_string().len()).unwrap_or(u16::MAX);
        layout.gutter_width = digits.saturating_add(2).min(layout.width);

        let rows = layout.visible_rows().max(1);
        if caret_line < layout.scroll {
            layout.scroll = caret_line;
        } else if caret_line >= layout.scroll + rows {
            layout.scroll = caret_line + 1 - rows;
        }

        self.frame.gutter.layout = layout.clone();
        self.frame.gutter.line_count = line_count;
        self.frame.gutter.caret_line = caret_line;
        self.frame.editor.layout = layout.clone();
    }
}

impl EditorEngine for ScratchEditor {
    fn attach(&mut self, surface: &mut dyn Surface) {
        surface.set_title("termhost");
        surface.set_cursor(CursorKind::Text);
        self.frame.editor.advance = surface.text_advance();

        self.trigger_action(Action::SelectAll);
        self.insert_text(WELCOME);
        self.trigger_action(Action::MoveUpDocument);
        self.undo.clear();
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.frame.layout.width = width;
        self.frame.layout.height = height;
        self.sync();
    }

    fn views(&self) -> Vec<&dyn View> {
        vec![&self.frame]
    }

    fn trigger_action(&mut self, action: Action) {
        let page = self.page();
        match action {
            Action::Undo => {
                if let Some(doc) = self.undo.pop() {
                    let current = std::mem::replace(self.doc_mut(), doc);
                    self.redo.push(current);
                }
            }
            Action::Redo => {
                if let Some(doc) = self.redo.pop() {
                    let current = std::mem::replace(self.doc_mut(), doc);
                    self.undo.push(current);
                }
            }

            Action::SelectAll => {
                let doc = self.doc_mut();
                doc.anchor = Some(Pos::default());
                doc.caret = doc.end();
            }
            // There is only ever one region.
            Action::SelectFirstRegion => {}
            Action::SelectUpLine => self.motion(true, |d, p| d.vertical(p, -1)),
            Action::SelectDownLine => self.motion(true, |d, p| d.vertical(p, 1)),
            Action::SelectLeftCharacter => self.motion(true, Document::left),
            Action::SelectRightCharacter => self.motion(true, Document::right),

            Action::DeleteLeftCharacter => self.delete_or(Document::left),
            Action::DeleteRightCharacter => self.delete_or(Document::right),

            Action::MoveUpLine => self.motion(false, |d, p| d.vertical(p, -1)),
            Action::MoveDownLine => self.motion(false, |d, p| d.vertical(p, 1)),
            Action::MoveLeftCharacter => self.motion(false, Document::left),
            Action::MoveRightCharacter => self.motion(false, Document::right),
            Action::MoveLeftWord => self.motion(false, Document::word_left),
            Action::MoveRightWord => self.motion(false, Document::word_right),
            Action::MoveLeftLine => self.motion(false, |_, p| Pos::new(p.line, 0)),
            Action::MoveRightLine => self.motion(false, |d, p| Pos::new(p.line, d.line_len(p.line))),
            Action::MoveUpPage => self.motion(false, |d, p| d.vertical(p, -page)),
            Action::MoveDownPage => self.motion(false, |d, p| d.vertical(p, page)),
            Action::MoveUpDocument => self.motion(false, |_, _| Pos::default()),
            Action::MoveDownDocument => self.motion(false, |d, _| d.end()),

            // The host routes these through clipboard events.
            Action::Cut | Action::Copy | Action::Paste => {}
        }
        self.sync();
    }

    fn insert_text(&mut self, text: &str) {
        self.checkpoint();
        self.doc_mut().insert(text);
        self.sync();
    }

    fn dispatch_clipboard_event(&mut self, event: &mut ClipboardEvent) {
        match event.kind {
            ClipboardEventKind::Copy => {
                let (start, end) = self.clip_range();
                event.text = self.doc().text_in(start, end);
            }
            ClipboardEventKind::Cut => {
                let (start, end) = self.clip_range();
                event.text = self.doc().text_in(start, end);
                if start != end {
                    self.checkpoint();
                    self.doc_mut().delete(start, end);
                }
            }
            ClipboardEventKind::Paste => {
                let text = std::mem::take(&mut event.text);
                self.insert_text(&text);
                event.text = text;
            }
        }
        self.sync();
    }

    fn view_with_focus(&self) -> Option<&dyn View> {
        Some(&self.frame.editor)
    }
}

#[cfg(test)]
impl ScratchEditor {
    fn text(&self) -> String {
        self.doc().lines.join("\n")
    }

    const fn caret(&self) -> Pos {
        self.doc().caret
    }

    fn selected_text(&self) -> Option<String> {
        let (start, end) = self.doc().selection()?;
        Some(self.doc().text_in(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use th_host::clipboard::ClipboardBridge;
    use th_host::color::{PAIR_COMMENT, PAIR_KEYWORD, PAIR_MARGIN, PAIR_SELECTED, PAIR_STRING};
    use th_host::config::{GlyphPolicy, HostConfig};
    use th_host::host::Host;
    use th_term::cell::Attr;
    use th_term::terminal::Size;

    fn editor_with(text: &str) -> ScratchEditor {
        let mut ed = ScratchEditor::new();
        ed.resize(40, 10);
        ed.insert_text(text);
        ed.trigger_action(Action::MoveUpDocument);
        ed
    }

    fn hosted(cols: u16, rows: u16) -> (Host, ScratchEditor) {
        let size = Size { cols, rows };
        let mut host = Host::new(&HostConfig::default(), size, ClipboardBridge::offline());
        let mut ed = ScratchEditor::new();
        ed.attach(&mut host);
        host.handle_resize(&mut ed, size);
        (host, ed)
    }

    // ── Welcome ─────────────────────────────────────────────────────────

    #[test]
    fn attach_shows_the_welcome_text() {
        let (host, ed) = hosted(40, 12);
        assert_eq!(ed.text(), WELCOME);
        assert_eq!(ed.caret(), Pos::new(0, 0));
        assert_eq!(ed.selected_text(), None);
        assert_eq!(host.title(), "termhost");
        assert_eq!(host.cursor(), CursorKind::Text);
    }

    #[test]
    fn welcome_is_not_undoable() {
        let (_, mut ed) = hosted(40, 12);
        ed.trigger_action(Action::Undo);
        assert_eq!(ed.text(), WELCOME);
    }

    // ── Editing ─────────────────────────────────────────────────────────

    #[test]
    fn insert_multiline_and_undo_redo() {
        let mut ed = editor_with("ab");
        ed.trigger_action(Action::MoveRightCharacter);
        ed.insert_text("1\n2\n3");
        assert_eq!(ed.text(), "a1\n2\n3b");
        assert_eq!(ed.caret(), Pos::new(2, 1));

        ed.trigger_action(Action::Undo);
        assert_eq!(ed.text(), "ab");
        ed.trigger_action(Action::Redo);
        assert_eq!(ed.text(), "a1\n2\n3b");
    }

    #[test]
    fn typing_replaces_the_selection() {
        let mut ed = editor_with("hello world");
        ed.trigger_action(Action::MoveRightWord);
        for _ in 0..6 {
            ed.trigger_action(Action::SelectRightCharacter);
        }
        assert_eq!(ed.selected_text().as_deref(), Some(" world"));
        ed.insert_text("!");
        assert_eq!(ed.text(), "hello!");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut ed = editor_with("ab\ncd");
        ed.trigger_action(Action::MoveDownLine);
        ed.trigger_action(Action::DeleteLeftCharacter);
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.caret(), Pos::new(0, 2));
        ed.trigger_action(Action::DeleteRightCharacter);
        assert_eq!(ed.text(), "abd");
    }

    #[test]
    fn word_and_line_motions() {
        let mut ed = editor_with("let x = 42;");
        ed.trigger_action(Action::MoveRightWord);
        assert_eq!(ed.caret(), Pos::new(0, 3));
        ed.trigger_action(Action::MoveRightWord);
        assert_eq!(ed.caret(), Pos::new(0, 5));
        ed.trigger_action(Action::MoveRightLine);
        assert_eq!(ed.caret(), Pos::new(0, 11));
        ed.trigger_action(Action::MoveLeftWord);
        assert_eq!(ed.caret(), Pos::new(0, 8));
        ed.trigger_action(Action::MoveLeftLine);
        assert_eq!(ed.caret(), Pos::new(0, 0));
    }

    #[test]
    fn paging_is_clamped() {
        let text = (1..=30).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let mut ed = editor_with(&text);
        ed.trigger_action(Action::MoveDownPage);
        assert_eq!(ed.caret().line, 9);
        ed.trigger_action(Action::MoveDownDocument);
        assert_eq!(ed.caret().line, 29);
        ed.trigger_action(Action::MoveUpPage);
        assert_eq!(ed.caret().line, 20);
    }

    // ── Clipboard ───────────────────────────────────────────────────────

    #[test]
    fn copy_without_selection_takes_the_line() {
        let mut ed = editor_with("one\ntwo");
        let mut event = ClipboardEvent::new(ClipboardEventKind::Copy);
        ed.dispatch_clipboard_event(&mut event);
        assert_eq!(event.text, "one\n");
        assert_eq!(ed.text(), "one\ntwo");
    }

    #[test]
    fn cut_line_then_paste() {
        let mut ed = editor_with("one\ntwo");
        let mut cut = ClipboardEvent::new(ClipboardEventKind::Cut);
        ed.dispatch_clipboard_event(&mut cut);
        assert_eq!(ed.text(), "two");

        ed.trigger_action(Action::MoveDownDocument);
        ed.insert_text("\n");
        let mut paste = ClipboardEvent::paste(cut.text);
        ed.dispatch_clipboard_event(&mut paste);
        assert_eq!(ed.text(), "two\none\n");
    }

    // ── Syntax ──────────────────────────────────────────────────────────

    #[test]
    fn classify_covers_the_line() {
        let spans = classify(r#"fn main() { let s = "hi"; 42 } // done"#);
        let colors: Vec<Color> = spans.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![
                Color::ForegroundKeyword,
                Color::ForegroundDefault,
                Color::ForegroundDefinition,
                Color::ForegroundDefault,
                Color::ForegroundKeyword,
                Color::ForegroundDefault,
                Color::ForegroundDefault,
                Color::ForegroundDefault,
                Color::ForegroundString,
                Color::ForegroundDefault,
                Color::ForegroundNumber,
                Color::ForegroundDefault,
                Color::ForegroundComment,
            ]
        );
        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert!(spans.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn classify_constants() {
        let colors: Vec<Color> = classify("MAX_LEN true x")
            .into_iter()
            .filter(|s| s.color != Color::ForegroundDefault)
            .map(|s| s.color)
            .collect();
        assert_eq!(colors, vec![Color::ForegroundConstant, Color::ForegroundKeywordConstant]);
    }

    #[test]
    fn lone_slash_is_plain() {
        let spans = classify("a / b");
        assert!(spans.iter().all(|s| s.color == Color::ForegroundDefault));
        assert_eq!(spans.last().map(|s| s.end), Some(5));
    }

    // ── Rendering ───────────────────────────────────────────────────────

    #[test]
    fn renders_margin_text_and_caret() {
        let (mut host, mut ed) = hosted(20, 4);
        ed.trigger_action(Action::SelectAll);
        ed.insert_text("fn f() {}\n\"s\" // c");
        ed.trigger_action(Action::MoveUpDocument);
        host.render(&ed);

        let screen = host.screen();
        assert_eq!(screen.row_text(0), " 1 fn f() {}        ");
        assert_eq!(screen.row_text(1), " 2 \"s\" // c         ");
        assert_eq!(screen.get(1, 0).map(|c| c.pair), Some(PAIR_MARGIN));
        assert_eq!(screen.get(3, 0).map(|c| (c.pair, c.attrs)), Some((PAIR_KEYWORD, Attr::UNDERLINE)));
        assert_eq!(screen.get(6, 0).map(|c| c.attrs), Some(Attr::BOLD));
        assert_eq!(screen.get(3, 1).map(|c| c.pair), Some(PAIR_STRING));
        assert_eq!(screen.get(10, 1).map(|c| c.pair), Some(PAIR_COMMENT));
    }

    #[test]
    fn renders_selection_and_whitespace_marks() {
        let (mut host, mut ed) = hosted(20, 3);
        ed.trigger_action(Action::SelectAll);
        ed.insert_text("ab  ");
        ed.trigger_action(Action::SelectAll);
        host.render(&ed);

        let screen = host.screen();
        assert_eq!(screen.row_text(0), " 1 ab··             ");
        for x in 3..7 {
            assert_eq!(screen.get(x, 0).map(|c| c.pair), Some(PAIR_SELECTED));
        }
        assert!(screen.get(5, 0).is_some_and(|c| c.attrs.contains(Attr::ALT_CHARSET)));
    }

    #[test]
    fn caret_line_scrolls_into_view() {
        let (mut host, mut ed) = hosted(20, 3);
        ed.trigger_action(Action::MoveDownDocument);
        host.render(&ed);
        // Welcome text has ten lines (the last empty); the last three show.
        assert_eq!(host.screen().row_text(0), "  8 Ctrl+Z: Undo    ");
        assert_eq!(host.screen().row_text(2), " 10                 ");
    }

    #[test]
    fn caret_and_selection_follow_the_host_glyph_policy() {
        // Gutter is three cells; tab and `中` precede the `x`.
        for (glyphs, x_col) in [(GlyphPolicy::Unicode, 6), (GlyphPolicy::Latin1, 5)] {
            let config = HostConfig {
                glyphs,
                ..HostConfig::default()
            };
            let size = Size { cols: 20, rows: 2 };
            let mut host = Host::new(&config, size, ClipboardBridge::offline());
            let mut ed = ScratchEditor::new();
            ed.attach(&mut host);
            host.handle_resize(&mut ed, size);
            ed.trigger_action(Action::SelectAll);
            ed.insert_text("\t中x");
            ed.trigger_action(Action::MoveLeftCharacter);
            ed.trigger_action(Action::SelectRightCharacter);
            host.render(&ed);

            let x = host.screen().get(x_col, 0).copied().unwrap_or_default();
            assert_eq!(x.character(), Some('x'), "{glyphs:?}");
            assert_eq!(x.pair, PAIR_SELECTED, "{glyphs:?}");
            let caret = host.screen().get(x_col + 1, 0).copied().unwrap_or_default();
            assert!(caret.attrs.contains(Attr::UNDERLINE), "{glyphs:?}");
        }
    }
}
