// SPDX-License-Identifier: MIT
//
// Cell compositor: semantic paint calls merged into cell attribute words.
//
// A view paints in roles ("keyword text here", "selection behind this") and
// the terminal can only hold one glyph, one color pair and a few style bits
// per cell. Painting is therefore read-modify-write: every call reads the
// cells it touches and merges into them, so a selection background painted
// first survives the text painted over it.
//
// The merge rules:
//
//   - Selection backgrounds only swap the color pair. Glyphs and style bits
//     stay.
//   - Text keeps a cell's existing non-zero pair and only brings its own pair
//     to cells that have none. Bold from the role is always merged in.
//   - A space painted over a space keeps the cell as it is, so re-painting a
//     line never erases what is underneath its whitespace.
//   - Wide glyphs take two cells. A glyph that would straddle the clip edge
//     is dropped whole.
//
// Nothing here can fail: anything outside the current clip or the screen is
// silently truncated.

use th_term::cell::{Attr, Cell};
use th_term::screen::{ClipRect, Screen};

use crate::clip::ClipStack;
use crate::color::{CellStyle, Color, PAIR_SELECTED};
use crate::config::{GlyphPolicy, MarginPolicy};
use crate::width::{WidthCache, map_glyph};

const SPACE: u32 = b' ' as u32;

// ─── Options ─────────────────────────────────────────────────────────────────

/// Per-frame paint settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOptions {
    pub carets_visible: bool,
    pub margin: MarginPolicy,
    pub glyphs: GlyphPolicy,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            carets_visible: true,
            margin: MarginPolicy::default(),
            glyphs: GlyphPolicy::default(),
        }
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────────

/// The paint context for one call: the shared screen, the clip the call is
/// confined to, and the width oracle.
///
/// Coordinates passed to the paint methods are local to the clip on top of
/// the stack.
pub struct Canvas<'a> {
    screen: &'a mut Screen,
    clip: &'a ClipStack,
    widths: &'a mut WidthCache,
    options: PaintOptions,
}

impl<'a> Canvas<'a> {
    pub const fn new(
        screen: &'a mut Screen,
        clip: &'a ClipStack,
        widths: &'a mut WidthCache,
        options: PaintOptions,
    ) -> Self {
        Self {
            screen,
            clip,
            widths,
            options,
        }
    }

    /// Paint a background rectangle.
    ///
    /// # Panics
    ///
    /// Panics if no clip is pushed.
    pub fn paint_background(&mut self, x: i32, y: i32, width: i32, height: i32, role: Color) {
        let blank = match role {
            Color::BackgroundSelected => false,
            Color::BackgroundMargin if self.options.margin == MarginPolicy::Blank => true,
            _ => return,
        };
        let Some(area) = self.visible(x, y, width, height) else {
            return;
        };

        for (cx, cy) in cells_of(area) {
            if blank {
                self.screen.break_wide_char_at(cx, cy);
                self.screen.set(cx, cy, Cell::EMPTY);
            } else if let Some(cell) = self.screen.get_mut(cx, cy) {
                cell.pair = PAIR_SELECTED;
            }
        }
    }

    /// Underline the cell at `(x, y)` when carets are showing.
    ///
    /// # Panics
    ///
    /// Panics if no clip is pushed.
    pub fn paint_caret(&mut self, x: i32, y: i32) {
        if !self.options.carets_visible {
            return;
        }
        let Some(area) = self.visible(x, y, 1, 1) else {
            return;
        };
        for (cx, cy) in cells_of(area) {
            if let Some(cell) = self.screen.get_mut(cx, cy) {
                cell.attrs |= Attr::UNDERLINE;
            }
        }
    }

    /// Paint a run of text starting at `(x, y)`. `alpha` is ignored:
    /// terminals cannot blend.
    ///
    /// # Panics
    ///
    /// Panics if no clip is pushed.
    pub fn paint_text(&mut self, x: i32, y: i32, text: &str, role: Color, _alpha: f32) {
        let clip = self.clip.current();
        let row = clip.y.saturating_add(y);
        if !clip.spans_row(row) {
            return;
        }
        let Ok(row) = u16::try_from(row) else {
            return;
        };
        if row >= self.screen.height() {
            return;
        }

        let left = clip.x.max(0);
        let right = clip.right().min(i32::from(self.screen.width()));
        let style = role.style();
        let mut col = clip.x.saturating_add(x);

        for ch in text.chars() {
            if col >= right {
                break;
            }
            let (glyph, alt) = map_glyph(u32::from(ch), self.options.glyphs);
            let wide = match self.widths.width(glyph) {
                0 => continue,
                1 => false,
                _ => true,
            };
            let start = col;
            col += if wide { 2 } else { 1 };
            if start < left || col > right {
                continue;
            }
            if let Ok(cx) = u16::try_from(start) {
                self.put(cx, row, glyph, alt, style, wide);
            }
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn put(&mut self, x: u16, y: u16, glyph: u32, alt: bool, style: CellStyle, wide: bool) {
        let Some(existing) = self.screen.get(x, y).copied() else {
            return;
        };

        let pair = if existing.pair == 0 {
            style.pair
        } else {
            existing.pair
        };
        let mut attrs = Attr::empty();
        attrs.set(Attr::BOLD, style.bold);

        let cell = if glyph == SPACE && !alt && existing.is_space() {
            Cell {
                pair,
                attrs: attrs | (existing.attrs & Attr::ALT_CHARSET),
                ..existing
            }
        } else {
            attrs.set(Attr::ALT_CHARSET, alt);
            Cell {
                ch: glyph,
                pair,
                attrs,
            }
        };

        self.screen.break_wide_char_at(x, y);
        if wide {
            self.screen.break_wide_char_at(x + 1, y);
            self.screen.set(x + 1, y, Cell::continuation(cell.pair, cell.attrs));
        }
        self.screen.set(x, y, cell);
    }

    /// The part of a clip-local rectangle that is inside both the clip and
    /// the screen, in screen coordinates.
    ///
    /// Worked in `i64` so that neither the offset nor a span wider than a
    /// `u16` is cut short before it meets the clip.
    fn visible(&self, x: i32, y: i32, width: i32, height: i32) -> Option<ClipRect> {
        let clip = self.clip.current();
        let bounds = clip.intersect(self.screen.bounds())?;
        let (x, width) = cut(bounds.x, bounds.width, clip.x, x, width)?;
        let (y, height) = cut(bounds.y, bounds.height, clip.y, y, height)?;
        Some(ClipRect::new(x, y, width, height))
    }
}

/// One axis of [`Canvas::visible`]: the span `offset..offset + extent` from
/// `origin`, cut to `lo..lo + len`.
fn cut(lo: i32, len: u16, origin: i32, offset: i32, extent: i32) -> Option<(i32, u16)> {
    let start = i64::from(origin) + i64::from(offset);
    let end = start + i64::from(extent.max(0));
    let start = start.max(i64::from(lo));
    let end = end.min(i64::from(lo) + i64::from(len));
    if start >= end {
        return None;
    }
    Some((i32::try_from(start).ok()?, u16::try_from(end - start).ok()?))
}

/// Every `(x, y)` of a rectangle already clipped to the screen.
fn cells_of(area: ClipRect) -> impl Iterator<Item = (u16, u16)> {
    // Clipped to the screen, so both origins are non-negative and in range.
    let x0 = u16::try_from(area.x).unwrap_or(0);
    let y0 = u16::try_from(area.y).unwrap_or(0);
    (y0..y0 + area.height).flat_map(move |y| (x0..x0 + area.width).map(move |x| (x, y)))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PAIR_CONSTANT, PAIR_KEYWORD};
    use pretty_assertions::assert_eq;

    struct Fixture {
        screen: Screen,
        clip: ClipStack,
        widths: WidthCache,
        options: PaintOptions,
    }

    impl Fixture {
        fn new(width: u16, height: u16) -> Self {
            let screen = Screen::new(width, height);
            let mut clip = ClipStack::new();
            clip.begin(screen.bounds());
            clip.push(screen.bounds());
            Self {
                screen,
                clip,
                widths: WidthCache::new(),
                options: PaintOptions::default(),
            }
        }

        fn canvas(&mut self) -> Canvas<'_> {
            Canvas::new(&mut self.screen, &self.clip, &mut self.widths, self.options)
        }

        fn cell(&self, x: u16, y: u16) -> Cell {
            self.screen.get(x, y).copied().unwrap_or_default()
        }

        fn text(&self, y: u16) -> String {
            self.screen.row_text(y)
        }
    }

    // ── Backgrounds ─────────────────────────────────────────────────────

    #[test]
    fn selection_swaps_only_the_pair() {
        let mut f = Fixture::new(6, 1);
        f.screen.set(1, 0, Cell::styled('x', PAIR_KEYWORD, Attr::BOLD));
        f.canvas().paint_background(0, 0, 3, 1, Color::BackgroundSelected);

        assert_eq!(f.cell(1, 0), Cell::styled('x', PAIR_SELECTED, Attr::BOLD));
        assert_eq!(f.cell(0, 0).pair, PAIR_SELECTED);
        assert_eq!(f.cell(3, 0).pair, 0);
    }

    #[test]
    fn blank_margin_clears_cells() {
        let mut f = Fixture::new(4, 1);
        f.screen.set(0, 0, Cell::styled('7', PAIR_CONSTANT, Attr::UNDERLINE));
        f.canvas().paint_background(0, 0, 2, 1, Color::BackgroundMargin);
        assert_eq!(f.cell(0, 0), Cell::EMPTY);
    }

    #[test]
    fn preserved_margin_is_untouched() {
        let mut f = Fixture::new(4, 1);
        f.options.margin = MarginPolicy::Preserve;
        f.screen.set(0, 0, Cell::new('7'));
        f.canvas().paint_background(0, 0, 2, 1, Color::BackgroundMargin);
        assert_eq!(f.cell(0, 0), Cell::new('7'));
    }

    #[test]
    fn other_backgrounds_are_no_ops() {
        let mut f = Fixture::new(4, 1);
        f.screen.set(0, 0, Cell::new('q'));
        let before = f.screen.clone();
        f.canvas().paint_background(0, 0, 4, 1, Color::BackgroundDefault);
        f.canvas().paint_background(0, 0, 4, 1, Color::Scrollbar);
        assert_eq!(f.screen, before);
    }

    #[test]
    fn background_is_clipped() {
        let mut f = Fixture::new(8, 3);
        f.clip.push(ClipRect::new(2, 1, 3, 1));
        f.canvas().paint_background(-5, -5, 100, 100, Color::BackgroundSelected);

        let selected: Vec<(u16, u16)> = (0..3)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| f.cell(x, y).pair == PAIR_SELECTED)
            .collect();
        assert_eq!(selected, vec![(2, 1), (3, 1), (4, 1)]);
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn text_on_blank_cells_takes_the_role_pair() {
        let mut f = Fixture::new(6, 1);
        f.canvas().paint_text(1, 0, "let", Color::ForegroundKeyword, 1.0);
        assert_eq!(f.text(0), " let  ");
        assert_eq!(f.cell(1, 0), Cell::styled('l', PAIR_KEYWORD, Attr::empty()));
    }

    #[test]
    fn selection_then_text_keeps_selection_pair() {
        let mut f = Fixture::new(6, 1);
        f.canvas().paint_background(0, 0, 6, 1, Color::BackgroundSelected);
        f.canvas().paint_text(0, 0, "fn", Color::ForegroundDefinition, 1.0);
        f.canvas().paint_text(3, 0, "if", Color::ForegroundKeyword, 1.0);

        assert_eq!(f.cell(0, 0), Cell::styled('f', PAIR_SELECTED, Attr::BOLD));
        assert_eq!(f.cell(1, 0), Cell::styled('n', PAIR_SELECTED, Attr::BOLD));
        assert_eq!(f.cell(3, 0), Cell::styled('i', PAIR_SELECTED, Attr::empty()));
    }

    #[test]
    fn definition_role_never_disturbs_the_pair() {
        let mut f = Fixture::new(4, 1);
        f.canvas().paint_text(0, 0, "ab", Color::ForegroundDefinition, 1.0);
        assert_eq!(f.cell(0, 0), Cell::styled('a', 0, Attr::BOLD));
    }

    #[test]
    fn repainting_is_idempotent() {
        let mut f = Fixture::new(10, 1);
        f.canvas().paint_background(2, 0, 5, 1, Color::BackgroundSelected);
        f.canvas().paint_text(0, 0, "a b\tc  d", Color::ForegroundString, 1.0);
        let once = f.screen.clone();
        f.canvas().paint_text(0, 0, "a b\tc  d", Color::ForegroundString, 1.0);
        assert_eq!(f.screen, once);
    }

    #[test]
    fn space_over_highlighted_space_keeps_highlight() {
        let mut f = Fixture::new(4, 1);
        f.canvas().paint_background(0, 0, 4, 1, Color::BackgroundSelected);
        f.canvas().paint_text(0, 0, "    ", Color::ForegroundDefault, 1.0);
        for x in 0..4 {
            assert_eq!(f.cell(x, 0), Cell::styled(' ', PAIR_SELECTED, Attr::empty()));
        }
    }

    #[test]
    fn space_replaces_a_glyph() {
        let mut f = Fixture::new(3, 1);
        f.screen.set(1, 0, Cell::new('z'));
        f.canvas().paint_text(0, 0, "   ", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), "   ");
    }

    #[test]
    fn zero_width_codepoints_do_not_advance() {
        let mut f = Fixture::new(6, 1);
        f.canvas().paint_text(2, 0, "\u{301}\u{302}x", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), "  x   ");
    }

    #[test]
    fn glyph_mapping() {
        let mut f = Fixture::new(6, 1);
        f.canvas().paint_text(0, 0, "a\tb\u{b7}", Color::ForegroundDefault, 1.0);
        assert_eq!(f.cell(1, 0), Cell::new(' '));
        assert_eq!(f.cell(3, 0), Cell::styled('~', 0, Attr::ALT_CHARSET));
        assert_eq!(f.text(0), "a b·  ");
    }

    #[test]
    fn latin1_policy_replaces_wide_codepoints() {
        let mut f = Fixture::new(6, 1);
        f.options.glyphs = GlyphPolicy::Latin1;
        f.canvas().paint_text(0, 0, "é中x", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), "é?x   ");
    }

    #[test]
    fn wide_glyph_writes_continuation() {
        let mut f = Fixture::new(5, 1);
        f.canvas().paint_text(0, 0, "中a", Color::ForegroundString, 1.0);
        assert!(f.cell(1, 0).is_continuation());
        assert_eq!(f.cell(2, 0).character(), Some('a'));
        assert_eq!(f.text(0), "中a  ");
    }

    #[test]
    fn overwriting_half_a_wide_glyph_breaks_it() {
        let mut f = Fixture::new(4, 1);
        f.canvas().paint_text(0, 0, "中", Color::ForegroundDefault, 1.0);
        f.canvas().paint_text(1, 0, "x", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), " x  ");
    }

    #[test]
    fn text_is_truncated_at_clip_edges() {
        let mut f = Fixture::new(8, 1);
        f.clip.push(ClipRect::new(2, 0, 3, 1));
        f.canvas().paint_text(-1, 0, "abcdef", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), "  bcd   ");
    }

    #[test]
    fn wide_glyph_straddling_the_edge_is_dropped() {
        let mut f = Fixture::new(6, 1);
        f.clip.push(ClipRect::new(0, 0, 3, 1));
        f.canvas().paint_text(1, 0, "a中", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), " a    ");
    }

    #[test]
    fn rows_outside_the_clip_are_ignored() {
        let mut f = Fixture::new(4, 3);
        f.clip.push(ClipRect::new(0, 1, 4, 1));
        f.canvas().paint_text(0, 1, "x", Color::ForegroundDefault, 1.0);
        f.canvas().paint_text(0, -1, "y", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), "    ");
        assert_eq!(f.text(2), "    ");
    }

    // ── Carets ──────────────────────────────────────────────────────────

    #[test]
    fn caret_underlines_when_visible() {
        let mut f = Fixture::new(4, 1);
        f.canvas().paint_text(0, 0, "ab", Color::ForegroundKeyword, 1.0);
        f.canvas().paint_caret(1, 0);
        assert_eq!(f.cell(1, 0), Cell::styled('b', PAIR_KEYWORD, Attr::UNDERLINE));
    }

    #[test]
    fn hidden_caret_is_ignored() {
        let mut f = Fixture::new(4, 1);
        f.options.carets_visible = false;
        f.canvas().paint_caret(1, 0);
        assert_eq!(f.cell(1, 0), Cell::EMPTY);
    }

    #[test]
    fn caret_outside_clip_is_ignored() {
        let mut f = Fixture::new(4, 2);
        f.clip.push(ClipRect::new(0, 0, 2, 1));
        f.canvas().paint_caret(3, 0);
        f.canvas().paint_caret(0, 1);
        f.canvas().paint_caret(-1, 0);
        assert!((0..4).all(|x| f.cell(x, 0) == Cell::EMPTY && f.cell(x, 1) == Cell::EMPTY));
    }

    // ── Extreme coordinates ─────────────────────────────────────────────

    #[test]
    fn text_at_the_ends_of_i32_is_dropped() {
        let mut f = Fixture::new(12, 2);
        f.clip.push(ClipRect::new(2, 0, 8, 2));
        f.canvas().paint_text(i32::MAX, 0, "x", Color::ForegroundDefault, 1.0);
        f.canvas().paint_text(i32::MIN, 0, "xyz", Color::ForegroundDefault, 1.0);
        f.canvas().paint_text(0, i32::MAX, "x", Color::ForegroundDefault, 1.0);
        f.canvas().paint_text(0, i32::MIN, "x", Color::ForegroundDefault, 1.0);
        assert_eq!(f.text(0), " ".repeat(12));
        assert_eq!(f.text(1), " ".repeat(12));
    }

    #[test]
    fn background_past_i32_max_is_dropped() {
        let mut f = Fixture::new(10, 1);
        f.canvas().paint_background(i32::MAX - 5, 0, 100, 1, Color::BackgroundSelected);
        f.canvas().paint_background(0, i32::MAX, 10, 100, Color::BackgroundSelected);
        assert!((0..10).all(|x| f.cell(x, 0).pair == 0));
    }

    #[test]
    fn background_wider_than_u16_still_covers_the_clip() {
        let mut f = Fixture::new(10, 1);
        f.canvas().paint_background(-70_000, 0, 100_000, 1, Color::BackgroundSelected);
        assert!((0..10).all(|x| f.cell(x, 0).pair == PAIR_SELECTED));
    }

    #[test]
    fn background_with_negative_extent_is_empty() {
        let mut f = Fixture::new(4, 1);
        f.canvas().paint_background(2, 0, -3, 1, Color::BackgroundSelected);
        f.canvas().paint_background(0, 0, i32::MIN, i32::MIN, Color::BackgroundSelected);
        assert!((0..4).all(|x| f.cell(x, 0).pair == 0));
    }

    #[test]
    fn caret_at_the_ends_of_i32_is_dropped() {
        let mut f = Fixture::new(4, 2);
        f.clip.push(ClipRect::new(1, 1, 2, 1));
        f.canvas().paint_caret(i32::MAX, i32::MAX);
        f.canvas().paint_caret(i32::MIN, i32::MIN);
        f.canvas().paint_caret(i32::MAX, 0);
        assert!((0..4).all(|x| f.cell(x, 0) == Cell::EMPTY && f.cell(x, 1) == Cell::EMPTY));
    }

    // ── Measured vs painted ─────────────────────────────────────────────

    #[test]
    fn painted_columns_follow_the_glyph_advance() {
        for glyphs in [GlyphPolicy::Unicode, GlyphPolicy::Latin1] {
            let mut f = Fixture::new(8, 1);
            f.options.glyphs = glyphs;
            let text = "\t中x";
            let advance = f.widths.advance_fn(glyphs);
            let x_col: usize = text
                .chars()
                .take_while(|&c| c != 'x')
                .map(|c| advance.width(u32::from(c)))
                .sum();

            f.canvas().paint_text(0, 0, text, Color::ForegroundDefault, 1.0);

            let painted = u16::try_from(x_col).unwrap();
            assert_eq!(f.cell(painted, 0).character(), Some('x'), "{glyphs:?}");
        }
    }
}
