// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Instead of redrawing the entire screen every frame, we compare the current
// Screen against the previous one and emit ANSI escape sequences only for
// cells that actually changed. A keystroke in an editor typically touches a
// row or two; the rest of the frame costs nothing.
//
// The pipeline per frame:
//
//   1. The host paints the view tree into a Screen.
//   2. DiffRenderer.render() compares it against the stored previous frame.
//   3. Changed cells go through CellWriter, which resolves pairs through the
//      palette and skips redundant cursor moves, pairs and attributes.
//   4. Everything accumulates in OutputBuffer; flush() is one write().
//
// Unchanged rows are skipped with a single slice comparison. Synchronized
// output (DEC 2026) wraps the frame to prevent flicker.

use std::io::{self, Write};

use crate::ansi::{self, DecMode};
use crate::output::{CellWriter, OutputBuffer};
use crate::palette::Palette;
use crate::screen::Screen;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from a render pass, for tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were rendered.
    pub cells_rendered: usize,
    /// Cells that matched the previous frame and were skipped.
    pub cells_skipped: usize,
    /// Total bytes of ANSI output generated.
    pub bytes_written: usize,
}

impl RenderStats {
    /// Total cells processed (rendered + skipped).
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Differential renderer that emits ANSI only for changed cells.
///
/// # Usage
///
/// ```no_run
/// use th_term::diff::DiffRenderer;
/// use th_term::palette::Palette;
/// use th_term::screen::Screen;
///
/// let mut renderer = DiffRenderer::new(Palette::default());
/// let screen = Screen::new(80, 24);
/// let stats = renderer.render(&screen);
/// renderer.flush().unwrap();
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    palette: Palette,
    previous: Option<Screen>,
}

impl DiffRenderer {
    /// Create a renderer with no previous frame (first render draws everything).
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            palette,
            previous: None,
        }
    }

    /// The palette pairs are resolved through.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Diff the current frame against the previous and generate ANSI output.
    pub fn render(&mut self, current: &Screen) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::dec_mode(&mut self.output, DecMode::SyncOutput, true).ok();

        let size_matches = self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.width() == width && prev.height() == height);
        let full_redraw = !size_matches;

        if full_redraw {
            ansi::clear_screen(&mut self.output).ok();
            ansi::cursor_to(&mut self.output, 0, 0).ok();
        }

        for y in 0..height {
            let Some(curr_row) = current.row(y) else {
                continue;
            };
            let prev_row = if full_redraw {
                None
            } else {
                self.previous.as_ref().and_then(|p| p.row(y))
            };

            if prev_row == Some(curr_row) {
                stats.cells_skipped += curr_row.len();
                continue;
            }

            for (x, cell) in (0..width).zip(curr_row) {
                let changed = prev_row.is_none_or(|row| row[usize::from(x)] != *cell);
                if changed {
                    self.writer
                        .render_cell(&mut self.output, &self.palette, x, y, cell);
                    stats.cells_rendered += 1;
                } else {
                    stats.cells_skipped += 1;
                }
            }
        }

        // Don't leak our SGR state into whatever the terminal draws next.
        ansi::reset(&mut self.output).ok();
        ansi::dec_mode(&mut self.output, DecMode::SyncOutput, false).ok();

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        stats
    }

    /// The raw ANSI bytes from the last render (for testing and debugging).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Discard the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &Screen) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
