// SPDX-License-Identifier: MIT
//
// Semantic colors and their cell styles.
//
// The engine never names a concrete color. It paints with roles ("this is a
// keyword", "this is the selection background") and the host decides what a
// role looks like on a terminal: one of six fixed color pairs, optionally
// bold. Roles without a pair leave whatever color the cell already has.

use th_term::palette::{AnsiColor, ColorPair, Palette};

// ─── Pair Slots ──────────────────────────────────────────────────────────────

pub const PAIR_COMMENT: u8 = 1;
pub const PAIR_CONSTANT: u8 = 2;
pub const PAIR_KEYWORD: u8 = 3;
pub const PAIR_MARGIN: u8 = 4;
pub const PAIR_SELECTED: u8 = 5;
pub const PAIR_STRING: u8 = 6;

/// The six fixed pairs, bound once at startup.
#[must_use]
pub fn default_palette() -> Palette {
    let mut palette = Palette::new();
    palette.bind(PAIR_COMMENT, ColorPair::fg(AnsiColor::Cyan));
    palette.bind(PAIR_CONSTANT, ColorPair::fg(AnsiColor::Magenta));
    palette.bind(PAIR_KEYWORD, ColorPair::fg(AnsiColor::Red));
    palette.bind(PAIR_MARGIN, ColorPair::fg(AnsiColor::Blue));
    palette.bind(PAIR_SELECTED, ColorPair::new(AnsiColor::Black, AnsiColor::Yellow));
    palette.bind(PAIR_STRING, ColorPair::fg(AnsiColor::Green));
    palette
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// A semantic paint role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    BackgroundDefault,
    BackgroundSelected,
    BackgroundMargin,
    ForegroundDefault,
    ForegroundKeyword,
    ForegroundKeywordConstant,
    ForegroundString,
    ForegroundComment,
    ForegroundConstant,
    ForegroundNumber,
    ForegroundDefinition,
    ForegroundMargin,
    ForegroundMarginHighlighted,
    Caret,
    Scrollbar,
    Squiggle,
}

/// What a role contributes to a cell's attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    /// Pair slot, or 0 for "no pair of its own".
    pub pair: u8,
    pub bold: bool,
}

impl Color {
    /// The role's cell style. Pure.
    #[must_use]
    pub const fn style(self) -> CellStyle {
        let (pair, bold) = match self {
            Self::ForegroundMargin | Self::ForegroundMarginHighlighted => (PAIR_MARGIN, false),
            Self::ForegroundKeyword | Self::ForegroundKeywordConstant => (PAIR_KEYWORD, false),
            Self::ForegroundConstant | Self::ForegroundNumber => (PAIR_CONSTANT, false),
            Self::ForegroundComment => (PAIR_COMMENT, false),
            Self::ForegroundString => (PAIR_STRING, false),
            Self::ForegroundDefinition => (0, true),
            _ => (0, false),
        };
        CellStyle { pair, bold }
    }
}
