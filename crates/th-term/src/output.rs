// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
// Two components work together to minimize terminal I/O:
//
//   OutputBuffer: accumulates all ANSI bytes in memory so the entire frame
//   can be written in a single write() syscall.
//
//   CellWriter: tracks the terminal's current state (cursor position, color
//   pair, attributes) and skips redundant escape sequences. Pairs are
//   resolved through the palette here, at the last possible moment; the grid
//   itself only ever holds pair indices.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::palette::Palette;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Write a Unicode codepoint as UTF-8.
    ///
    /// Invalid codepoints (including 0, the continuation marker) produce `?`.
    pub fn write_codepoint(&mut self, cp: u32) {
        match char::from_u32(cp).filter(|_| cp != 0) {
            Some(ch) => {
                let mut enc = [0u8; 4];
                self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
            }
            None => self.buf.push(b'?'),
        }
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Stateful cell renderer that tracks terminal state to skip redundant escapes.
///
/// - **Cursor**: skipped when the next cell is at `(last_x + 1, last_y)`.
/// - **Attributes**: on change, reset (SGR 0) and re-emit. The reset also
///   invalidates the tracked pair. Going from no attributes to some skips
///   the reset.
/// - **Pair**: fg and bg are re-emitted only when the pair index changes.
/// - **Wide chars**: continuation cells produce no output when preceded by
///   their owner (the terminal already drew both columns).
#[allow(clippy::struct_field_names)] // The `last_` prefix IS the semantic grouping.
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_pair: Option<u8>,
    last_attrs: Attr,
}

impl CellWriter {
    /// Create a writer with no tracked state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_pair: None,
            last_attrs: Attr::empty(),
        }
    }

    /// Reset all tracked state. Call after a terminal reset or screen clear.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Render a single cell, emitting only the escape sequences needed.
    pub fn render_cell(
        &mut self,
        out: &mut OutputBuffer,
        palette: &Palette,
        x: u16,
        y: u16,
        cell: &Cell,
    ) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        if cell.is_continuation() {
            if xi > 0 && self.last_x == xi - 1 && self.last_y == yi {
                self.last_x = xi;
                return;
            }
            // Orphaned continuation: fill with a space in the right colors.
            self.apply_style(out, palette, cell);
            out.buf.push(b' ');
            self.last_x = xi;
            self.last_y = yi;
            return;
        }

        self.apply_style(out, palette, cell);
        out.write_codepoint(cell.display_codepoint());

        self.last_x = xi;
        self.last_y = yi;
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, palette: &Palette, cell: &Cell) {
        let attrs = cell.attrs.difference(Attr::ALT_CHARSET);
        if attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_pair = None;
            }
            self.last_attrs = attrs;
            ansi::attrs(out, attrs).ok();
        }

        if self.last_pair != Some(cell.pair) {
            let pair = palette.get(cell.pair);
            ansi::fg(out, pair.fg).ok();
            ansi::bg(out, pair.bg).ok();
            self.last_pair = Some(cell.pair);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{AnsiColor, ColorPair};

    fn palette() -> Palette {
        let mut palette = Palette::new();
        palette.bind(1, ColorPair::fg(AnsiColor::Cyan));
        palette.bind(5, ColorPair::new(AnsiColor::Black, AnsiColor::Yellow));
        palette
    }

    /// Render a sequence of cells and return the output as a string.
    fn render_seq(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        let palette = palette();
        for &(x, y, ref cell) in cells {
            writer.render_cell(&mut out, &palette, x, y, cell);
        }
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn output_buffer_write_trait() {
        let mut buf = OutputBuffer::new();
        write!(buf, "hello {}", 42).unwrap();
        assert_eq!(buf.as_bytes(), b"hello 42");
    }

    #[test]
    fn write_codepoint_variants() {
        let mut buf = OutputBuffer::new();
        buf.write_codepoint(u32::from('中'));
        buf.write_codepoint(0);
        buf.write_codepoint(0xD800);
        assert_eq!(buf.as_bytes(), "中??".as_bytes());
    }

    #[test]
    fn flush_to_clears() {
        let mut buf = OutputBuffer::new();
        write!(buf, "frame data").unwrap();
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert_eq!(dest, b"frame data");
        assert!(buf.is_empty());
    }

    // ── CellWriter: cursor ─────────────────────────────────────────────

    #[test]
    fn sequential_cells_skip_cursor_move() {
        let output = render_seq(&[
            (0, 0, Cell::new('A')),
            (1, 0, Cell::new('B')),
            (2, 0, Cell::new('C')),
        ]);
        assert_eq!(output.matches('H').count(), 1);
        assert!(output.contains("ABC"));
    }

    #[test]
    fn different_row_emits_cursor_move() {
        let output = render_seq(&[(0, 0, Cell::new('A')), (0, 1, Cell::new('B'))]);
        assert_eq!(output.matches('H').count(), 2);
    }

    // ── CellWriter: pairs ──────────────────────────────────────────────

    #[test]
    fn pair_resolved_through_palette() {
        let output = render_seq(&[(0, 0, Cell::styled('x', 5, Attr::empty()))]);
        assert!(output.contains("\x1b[30m"));
        assert!(output.contains("\x1b[43m"));
    }

    #[test]
    fn same_pair_not_re_emitted() {
        let output = render_seq(&[
            (0, 0, Cell::styled('a', 1, Attr::empty())),
            (1, 0, Cell::styled('b', 1, Attr::empty())),
        ]);
        assert_eq!(output.matches("\x1b[36m").count(), 1);
    }

    // ── CellWriter: attributes ─────────────────────────────────────────

    #[test]
    fn attr_change_resets_and_re_emits_pair() {
        let output = render_seq(&[
            (0, 0, Cell::styled('a', 1, Attr::BOLD)),
            (1, 0, Cell::styled('b', 1, Attr::UNDERLINE)),
        ]);
        assert!(output.contains("\x1b[0m"));
        assert!(output.contains("\x1b[4m"));
        assert_eq!(output.matches("\x1b[36m").count(), 2);
    }

    #[test]
    fn none_to_attr_skips_reset() {
        let output = render_seq(&[
            (0, 0, Cell::new('A')),
            (1, 0, Cell::styled('B', 0, Attr::BOLD)),
        ]);
        assert!(!output.contains("\x1b[0m"));
        assert!(output.contains("\x1b[1m"));
    }

    #[test]
    fn alt_charset_glyph_translated_without_sgr() {
        let output = render_seq(&[(0, 0, Cell::styled('~', 0, Attr::ALT_CHARSET))]);
        assert!(output.ends_with('·'));
        assert!(!output.contains('~'));
    }

    // ── CellWriter: wide chars ─────────────────────────────────────────

    #[test]
    fn continuation_after_wide_char_skipped() {
        let output = render_seq(&[
            (3, 0, Cell::new('中')),
            (4, 0, Cell::continuation(0, Attr::empty())),
        ]);
        assert!(output.ends_with('中'));
    }

    #[test]
    fn orphan_continuation_emits_space() {
        let output = render_seq(&[(4, 0, Cell::continuation(5, Attr::empty()))]);
        assert!(output.contains("\x1b[1;5H"));
        assert!(output.ends_with(' '));
    }
}
