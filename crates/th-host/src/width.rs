// SPDX-License-Identifier: MIT
//
// Advance-width oracle.
//
// The engine lays text out in cells, so it asks for every codepoint's width
// over and over. The terminal driver answers with a wcwidth-style query that
// may report -1 for unprintable codepoints; we clamp that to 0 and memoize
// per codepoint. The cache is never invalidated: a codepoint's width does not
// change during a session.
//
// Widths are always taken of the glyph that will actually reach the cell,
// after `map_glyph`. The compositor paints with the same mapping, so what the
// engine measures and what lands on screen cannot disagree.

use std::collections::HashMap;
use std::rc::Rc;

use th_term::screen::measure;

use crate::config::GlyphPolicy;

const SPACE: u32 = b' ' as u32;
const TAB: u32 = b'\t' as u32;
/// MIDDLE DOT, which the engine uses to mark visible whitespace.
const MIDDLE_DOT: u32 = 0xB7;
/// The VT100 key for the bullet glyph in the alternate charset.
const ACS_BULLET: u32 = b'~' as u32;
const REPLACEMENT: u32 = b'?' as u32;

/// The glyph that reaches the cell for `cp`, and whether it is an
/// alternate-charset key.
#[must_use]
pub const fn map_glyph(cp: u32, glyphs: GlyphPolicy) -> (u32, bool) {
    match cp {
        TAB => (SPACE, false),
        MIDDLE_DOT => (ACS_BULLET, true),
        cp if cp > 0xFF && matches!(glyphs, GlyphPolicy::Latin1) => (REPLACEMENT, false),
        cp => (cp, false),
    }
}

/// The driver query the cache sits in front of.
pub type MeasureFn = Rc<dyn Fn(u32) -> i32>;

fn clamp_width(raw: i32) -> u8 {
    u8::try_from(raw.clamp(0, 2)).unwrap_or(0)
}

/// Memoized codepoint → cell width (0, 1 or 2).
pub struct WidthCache {
    widths: HashMap<u32, u8>,
    measure: MeasureFn,
}

impl WidthCache {
    /// A cache backed by the terminal driver's `measure`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_measure(Rc::new(measure))
    }

    /// A cache backed by a custom query.
    #[must_use]
    pub fn with_measure(measure: MeasureFn) -> Self {
        Self {
            widths: HashMap::new(),
            measure,
        }
    }

    /// Width of `cp` in cells. Unprintable codepoints are 0.
    pub fn width(&mut self, cp: u32) -> usize {
        if let Some(&w) = self.widths.get(&cp) {
            return usize::from(w);
        }
        let w = clamp_width((self.measure)(cp));
        self.widths.insert(cp, w);
        usize::from(w)
    }

    /// Cells `cp` advances by once mapped under `glyphs`.
    pub fn advance(&mut self, cp: u32, glyphs: GlyphPolicy) -> usize {
        self.width(map_glyph(cp, glyphs).0)
    }

    /// A detached width function with this cache's query and `glyphs`.
    #[must_use]
    pub fn advance_fn(&self, glyphs: GlyphPolicy) -> Advance {
        Advance {
            glyphs,
            measure: Rc::clone(&self.measure),
        }
    }

    /// Number of distinct codepoints measured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidthCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidthCache")
            .field("cached", &self.widths.len())
            .finish_non_exhaustive()
    }
}

// ─── Advance ─────────────────────────────────────────────────────────────────

/// Codepoint → cells, for engines that lay text out outside a paint call.
///
/// Carries the host's glyph policy and driver query, so it agrees with
/// [`Platform::advance_width`](crate::platform::Platform::advance_width) and
/// with what the compositor paints. Not memoized.
#[derive(Clone)]
pub struct Advance {
    glyphs: GlyphPolicy,
    measure: MeasureFn,
}

impl Advance {
    #[must_use]
    pub fn width(&self, cp: u32) -> usize {
        usize::from(clamp_width((self.measure)(map_glyph(cp, self.glyphs).0)))
    }

    #[must_use]
    pub const fn glyphs(&self) -> GlyphPolicy {
        self.glyphs
    }
}

impl Default for Advance {
    fn default() -> Self {
        WidthCache::new().advance_fn(GlyphPolicy::default())
    }
}

impl std::fmt::Debug for Advance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advance")
            .field("glyphs", &self.glyphs)
            .finish_non_exhaustive()
    }
}
