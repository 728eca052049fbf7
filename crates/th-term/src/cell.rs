// SPDX-License-Identifier: MIT
//
// Cell: the atomic unit of the screen grid.
//
// Every character position on screen is a Cell: a Unicode codepoint plus an
// attribute word. The attribute word is deliberately curses-shaped: a color
// pair index (resolved through the `Palette` only at output time) and a small
// set of style bits. The bridge above us merges attribute words cell by cell,
// so they have to be cheap to compare and cheap to rewrite.
//
// Size: 8 bytes per cell. A 200×50 terminal = 10,000 cells = 80 KB per grid.
//
// Wide characters (CJK, some emoji) occupy two columns. The first cell holds
// the codepoint; the second is a continuation cell (ch = 0). The renderer
// skips continuation cells when outputting characters but still applies
// their pair and attributes for correct background fill.
//
// Alternate-charset glyphs are stored the way curses stores them: the
// codepoint is the VT100 line-drawing key (`q`, `x`, `~`, ...) and the
// `ALT_CHARSET` bit is set. `display_codepoint` resolves them to Unicode.

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Style bits of a cell's attribute word.
    ///
    /// ```
    /// use th_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::ALT_CHARSET));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD        = 1 << 0;
        /// SGR 4: straight underline. Carets are drawn with this.
        const UNDERLINE   = 1 << 1;
        /// SGR 7: swap foreground and background.
        const REVERSE     = 1 << 2;
        /// The codepoint is a VT100 line-drawing key, not a literal glyph.
        const ALT_CHARSET = 1 << 3;
    }
}

// ─── Alternate Charset ───────────────────────────────────────────────────────

/// Resolve a VT100 special-graphics key to its Unicode glyph.
///
/// Keys outside the table resolve to themselves.
#[must_use]
pub const fn acs_glyph(key: u32) -> u32 {
    let glyph = match key {
        0x60 => '◆', // `
        0x61 => '▒', // a
        0x66 => '°', // f
        0x67 => '±', // g
        0x6A => '┘', // j
        0x6B => '┐', // k
        0x6C => '┌', // l
        0x6D => '└', // m
        0x6E => '┼', // n
        0x71 => '─', // q
        0x74 => '├', // t
        0x75 => '┤', // u
        0x76 => '┴', // v
        0x77 => '┬', // w
        0x78 => '│', // x
        0x7E => '·', // ~ (bullet)
        _ => return key,
    };
    glyph as u32
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single screen cell: codepoint plus attribute word.
///
/// # Layout (8 bytes)
///
/// ```text
/// ┌──────────┬──────┬───────┬─────────┐
/// │ ch: u32  │ pair │ attrs │ padding │
/// │ 4 bytes  │  u8  │  u8   │ 2 bytes │
/// └──────────┴──────┴───────┴─────────┘
/// ```
///
/// Pair `0` is the terminal's default foreground/background.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unicode codepoint to display.
    ///
    /// - `0` = continuation cell (second column of a wide character)
    /// - `b' '` (32) = empty / space (the default)
    /// - Any other value = the character to render
    pub ch: u32,

    /// Color pair index into the palette. `0` = terminal default.
    pub pair: u8,

    /// Style bits.
    pub attrs: Attr,
}

/// Continuation marker: a cell whose `ch` is 0 belongs to the preceding
/// wide character and should not produce character output.
const CONTINUATION: u32 = 0;

/// Default character for empty cells.
const SPACE: u32 = b' ' as u32;

impl Cell {
    /// An empty cell: space character, default pair, no attributes.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        pair: 0,
        attrs: Attr::empty(),
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            pair: 0,
            attrs: Attr::empty(),
        }
    }

    /// Create a cell with a character, pair and attributes.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, pair: u8, attrs: Attr) -> Self {
        Self {
            ch: ch as u32,
            pair,
            attrs,
        }
    }

    /// Create a continuation cell for wide characters.
    ///
    /// Continuation cells carry the pair and attributes of their owner so
    /// that the background fills correctly.
    #[inline]
    #[must_use]
    pub const fn continuation(pair: u8, attrs: Attr) -> Self {
        Self {
            ch: CONTINUATION,
            pair,
            attrs,
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this is a continuation cell (second column of a wide char).
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether this cell holds a plain space (not an alternate-charset key).
    #[inline]
    #[must_use]
    pub const fn is_space(self) -> bool {
        self.ch == SPACE
    }

    /// Whether this cell is visually empty (space, default pair, no styling).
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.ch == SPACE && self.pair == 0 && self.attrs.is_empty()
    }

    /// The stored codepoint as a `char`, if valid.
    ///
    /// Returns `None` for continuation cells and invalid scalar values.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            return None;
        }
        char::from_u32(self.ch)
    }

    /// The codepoint to put on the wire, with alternate-charset keys
    /// resolved to their Unicode glyphs.
    #[inline]
    #[must_use]
    pub const fn display_codepoint(self) -> u32 {
        if self.attrs.contains(Attr::ALT_CHARSET) {
            acs_glyph(self.ch)
        } else {
            self.ch
        }
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Set the color pair.
    #[inline]
    #[must_use]
    pub const fn with_pair(self, pair: u8) -> Self {
        Self { pair, ..self }
    }

    /// Set the style bits.
    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Reset this cell to empty.
    #[inline]
    pub const fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Whether two cells share pair and attributes, ignoring the glyph.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.pair == other.pair && self.attrs == other.attrs
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            write!(f, "Cell(continuation")?;
        } else {
            let ch = char::from_u32(self.ch).unwrap_or('?');
            write!(f, "Cell({ch:?}")?;
        }
        if self.pair != 0 {
            write!(f, ", pair={}", self.pair)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
