// SPDX-License-Identifier: MIT
//
// Palette: the fixed table of foreground/background color pairs.
//
// Cells never store colors. They store a small pair index, and the palette
// resolves that index to a pair of the eight standard ANSI colors (or the
// terminal default) at output time. Pair 0 is always the terminal default
// on both planes and cannot be rebound.
//
// The table is bound once at startup. Changing a binding afterwards is
// allowed but only affects cells the diff renderer emits from then on.

// ─── AnsiColor ───────────────────────────────────────────────────────────────

/// One of the eight standard ANSI colors, or the terminal's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AnsiColor {
    /// The terminal's configured default (SGR 39 / 49).
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    /// Offset within the SGR 30–37 / 40–47 ranges, or `None` for default.
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Black => Some(0),
            Self::Red => Some(1),
            Self::Green => Some(2),
            Self::Yellow => Some(3),
            Self::Blue => Some(4),
            Self::Magenta => Some(5),
            Self::Cyan => Some(6),
            Self::White => Some(7),
        }
    }
}

// ─── ColorPair ───────────────────────────────────────────────────────────────

/// A foreground/background binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ColorPair {
    pub fg: AnsiColor,
    pub bg: AnsiColor,
}

impl ColorPair {
    /// Terminal default on both planes.
    pub const DEFAULT: Self = Self::new(AnsiColor::Default, AnsiColor::Default);

    #[inline]
    #[must_use]
    pub const fn new(fg: AnsiColor, bg: AnsiColor) -> Self {
        Self { fg, bg }
    }

    /// A foreground color over the terminal's default background.
    #[inline]
    #[must_use]
    pub const fn fg(fg: AnsiColor) -> Self {
        Self::new(fg, AnsiColor::Default)
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────────

/// Number of pair slots, including the fixed default slot 0.
pub const PAIR_SLOTS: usize = 8;

/// Pair index → [`ColorPair`] table.
///
/// # Examples
///
/// ```
/// use th_term::palette::{AnsiColor, ColorPair, Palette};
///
/// let mut palette = Palette::new();
/// assert!(palette.bind(3, ColorPair::fg(AnsiColor::Red)));
/// assert_eq!(palette.get(3).fg, AnsiColor::Red);
/// assert!(!palette.bind(0, ColorPair::fg(AnsiColor::Red)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pairs: [ColorPair; PAIR_SLOTS],
}

impl Palette {
    /// A palette with every slot bound to the terminal default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pairs: [ColorPair::DEFAULT; PAIR_SLOTS],
        }
    }

    /// Bind a slot. Slot 0 and out-of-range slots are rejected.
    ///
    /// Returns `true` if the binding took effect.
    pub fn bind(&mut self, index: u8, pair: ColorPair) -> bool {
        let idx = usize::from(index);
        if idx == 0 || idx >= PAIR_SLOTS {
            return false;
        }
        self.pairs[idx] = pair;
        true
    }

    /// Resolve a slot. Unbound or out-of-range slots resolve to the default.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u8) -> ColorPair {
        self.pairs
            .get(usize::from(index))
            .copied()
            .unwrap_or(ColorPair::DEFAULT)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_palette_is_all_default() {
        let palette = Palette::new();
        for i in 0..PAIR_SLOTS {
            #[allow(clippy::cast_possible_truncation)]
            let idx = i as u8;
            assert_eq!(palette.get(idx), ColorPair::DEFAULT);
        }
    }

    #[test]
    fn bind_and_resolve() {
        let mut palette = Palette::new();
        let selected = ColorPair::new(AnsiColor::Black, AnsiColor::Yellow);
        assert!(palette.bind(5, selected));
        assert_eq!(palette.get(5), selected);
    }

    #[test]
    fn slot_zero_is_fixed() {
        let mut palette = Palette::new();
        assert!(!palette.bind(0, ColorPair::fg(AnsiColor::Cyan)));
        assert_eq!(palette.get(0), ColorPair::DEFAULT);
    }

    #[test]
    fn out_of_range_slots() {
        let mut palette = Palette::new();
        assert!(!palette.bind(200, ColorPair::fg(AnsiColor::Cyan)));
        assert_eq!(palette.get(200), ColorPair::DEFAULT);
    }

    #[test]
    fn ansi_index_mapping() {
        assert_eq!(AnsiColor::Default.index(), None);
        assert_eq!(AnsiColor::Black.index(), Some(0));
        assert_eq!(AnsiColor::White.index(), Some(7));
    }
}
