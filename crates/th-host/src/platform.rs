// SPDX-License-Identifier: MIT
//
// The three narrow interfaces the editing engine paints and queries through.
//
// The engine was written for pixel surfaces, so these traits keep its
// vocabulary (fonts, cursors, shadows) even though a terminal host answers
// most of it with "one cell" or "nothing". All
// coordinates are whole cells, local to the innermost view being rendered.

use th_term::terminal::Size;

use crate::color::Color;
use crate::width::Advance;

// ─── Platform ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingSystem {
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserAgent {
    #[default]
    Unknown,
}

/// Font slots the engine asks metrics for. A terminal has exactly one font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Text,
}

/// Vertical font metrics, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub ascent: u16,
    pub descent: u16,
    pub line_height: u16,
    /// Advance of a typical narrow glyph.
    pub average_advance: u16,
}

impl FontMetrics {
    /// One cell per glyph, one row per line.
    pub const CELL: Self = Self {
        ascent: 1,
        descent: 0,
        line_height: 1,
        average_advance: 1,
    };
}

/// Environment queries.
pub trait Platform {
    fn operating_system(&self) -> OperatingSystem;

    fn user_agent(&self) -> UserAgent;

    /// Wall-clock time, used by the engine for double-click and animation
    /// timing.
    fn now_in_seconds(&self) -> f64;

    fn font_metrics(&self, font: Font) -> FontMetrics;

    /// Columns `cp` advances the pen by, after the host's glyph policy.
    fn advance_width(&mut self, font: Font, cp: u32) -> usize;

    /// A detached [`advance_width`](Self::advance_width), for laying text
    /// out when the platform is not at hand.
    fn text_advance(&self) -> Advance;
}

// ─── Window ──────────────────────────────────────────────────────────────────

/// Pointer shapes. Terminals without mouse support ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Arrow,
    Text,
    Pointer,
}

/// The surface the engine lives in.
pub trait Window {
    fn set_title(&mut self, title: &str);

    /// Request a repaint at the next opportunity.
    fn invalidate(&mut self);

    fn set_cursor(&mut self, cursor: CursorKind);

    fn size(&self) -> Size;
}

// ─── SemanticRenderer ────────────────────────────────────────────────────────

/// Paint calls issued by views during a render pass.
///
/// Coordinates are local to the view currently being rendered; the host
/// translates and clips them.
pub trait SemanticRenderer {
    fn render_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    fn render_caret(&mut self, x: i32, y: i32);

    /// Draw a run of text starting at `(x, y)`. `alpha` is in `0.0..=1.0`.
    fn render_text(&mut self, x: i32, y: i32, text: &str, color: Color, alpha: f32);

    fn render_squiggle(&mut self, x: i32, y: i32, width: i32, color: Color);

    fn render_rightward_shadow(&mut self, x: i32, y: i32, width: i32, height: i32);

    fn render_horizontal_line(&mut self, x: i32, y: i32, width: i32, color: Color);

    fn render_vertical_line(&mut self, x: i32, y: i32, height: i32, color: Color);

    fn render_scrollbar_thumb(&mut self, x: i32, y: i32, width: i32, height: i32);
}
