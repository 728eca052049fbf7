// SPDX-License-Identifier: MIT
//
// Screen: the shared 2D cell grid every view paints into.
//
// This is the black-box screen buffer of the terminal driver: the bridge
// reads a cell, merges its attribute word, and writes it back. Nothing here
// knows about views, roles or carets. The diff renderer compares one Screen
// against the previous frame and emits only the differences.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are contiguous,
//     so left-to-right scanning (which painting and rendering both do) is a
//     linear walk.
//
//   - `ClipRect` uses signed coordinates. Views can sit partly off-screen and
//     nested rectangles are translated before they are intersected, so
//     negative origins are normal in intermediate results.
//
//   - Wide characters occupy two columns: the codepoint cell followed by a
//     continuation cell (ch = 0). `break_wide_char_at` repairs neighbours
//     when a write lands on half of one.
//
//   - `measure` is the driver's wcwidth: -1 for unprintable codepoints,
//     otherwise 0, 1 or 2 columns per Unicode Standard Annex #11.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;

// ─── ClipRect ───────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle in cell coordinates.
///
/// The right and bottom edges are exclusive.
///
/// # Examples
///
/// ```
/// use th_term::screen::ClipRect;
///
/// let clip = ClipRect::new(10, 5, 80, 24);
/// assert!(clip.contains(10, 5));    // top-left corner: inside
/// assert!(clip.contains(89, 28));   // bottom-right corner: inside
/// assert!(!clip.contains(9, 5));    // left of bounds: outside
/// assert!(!clip.contains(90, 5));   // right of bounds: outside
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ClipRect {
    /// Left edge (may be negative).
    pub x: i32,
    /// Top edge (may be negative).
    pub y: i32,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl ClipRect {
    /// Create a rectangle from its origin and extent.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive): `x + width`, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Bottom edge (exclusive): `y + height`, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Whether this rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether a point is inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Whether row `py` falls inside the vertical span.
    #[inline]
    #[must_use]
    pub const fn spans_row(self, py: i32) -> bool {
        py >= self.y && py < self.bottom()
    }

    /// The same rectangle moved by `(dx, dy)`. The origin saturates at the
    /// ends of `i32`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Compute the intersection of two rectangles.
    ///
    /// Returns `None` if they don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            // Both differences are positive and bounded by u16 extents.
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            Some(Self {
                x: x1,
                y: y1,
                width: (x2 - x1) as u16,
                height: (y2 - y1) as u16,
            })
        } else {
            None
        }
    }

    /// Intersection, collapsing to an empty rectangle at the clamped origin
    /// when the two do not overlap.
    #[must_use]
    pub fn clamp_to(self, outer: Self) -> Self {
        self.intersect(outer).unwrap_or_else(|| {
            let x = self.x.clamp(outer.x, outer.right());
            let y = self.y.clamp(outer.y, outer.bottom());
            Self::new(x, y, 0, 0)
        })
    }
}

// ─── Screen ────────────────────────────────────────────────────────────────────

/// A 2D grid of cells, the canvas everything paints to.
///
/// # Examples
///
/// ```
/// use th_term::screen::Screen;
/// use th_term::cell::Cell;
///
/// let mut screen = Screen::new(80, 24);
/// screen.set(5, 3, Cell::new('X'));
/// assert_eq!(screen.get(5, 3).and_then(|c| c.character()), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Screen {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a grid filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Grid width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full grid as a [`ClipRect`] at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    /// Whether `(x, y)` is within the grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The visible text of row `y`, continuation cells skipped and
    /// alternate-charset keys resolved. Empty for out-of-bounds rows.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter(|cell| !cell.is_continuation())
            .map(|cell| char::from_u32(cell.display_codepoint()).unwrap_or('?'))
            .collect()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Clear the grid to empty cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the grid, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    /// Copy every cell from a grid of identical dimensions.
    ///
    /// Grids of different sizes are replaced wholesale instead.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Direct Cell Access ──────────────────────────────────────────────

    /// Write a cell directly. No clipping, no wide-char cleanup.
    ///
    /// Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    // ─── Wide Character Cleanup ──────────────────────────────────────────

    /// Break any wide character that touches position `(x, y)`.
    ///
    /// - If `(x, y)` is a continuation cell, the owner at `x - 1` becomes a
    ///   space.
    /// - If the cell after `(x, y)` is a continuation, it is orphaned by a
    ///   write here and becomes a space too.
    ///
    /// Pair and attributes of the repaired cells are kept.
    pub fn break_wide_char_at(&mut self, x: u16, y: u16) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next].ch = u32::from(b' ');
            }
        }
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Screen({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────────

/// Number of columns a codepoint occupies, `wcwidth`-style.
///
/// Returns -1 for invalid scalar values and control characters, otherwise
/// 0, 1 or 2.
///
/// # Examples
///
/// ```
/// use th_term::screen::measure;
///
/// assert_eq!(measure(u32::from('a')), 1);
/// assert_eq!(measure(u32::from('中')), 2);
/// assert_eq!(measure(u32::from('\u{301}')), 0);
/// assert_eq!(measure(0x07), -1);
/// ```
#[must_use]
pub fn measure(cp: u32) -> i32 {
    char::from_u32(cp)
        .and_then(UnicodeWidthChar::width)
        .map_or(-1, |w| {
            // unicode-width never reports more than 2 columns.
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let w = w as i32;
            w
        })
}

// ─── Tests ──────────────────────────────────────────────────────────────────────
